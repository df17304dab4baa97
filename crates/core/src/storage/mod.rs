mod error;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use traits::NoteStore;
pub use types::{KeyValue, ScanCursor, ScanOutput};
