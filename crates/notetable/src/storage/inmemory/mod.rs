mod store;

pub use store::{InMemoryStore, Operation};
