mod operations;
mod types;

pub use operations::{format_definition, readiness};
pub use types::{AttributeType, KeyAttribute, Readiness, TableDefinition, TableStatus, Throughput};
