//! Pure building blocks for the notetable workflows.
//!
//! Nothing in this crate performs I/O. The `notetable` binary supplies the
//! store implementation, the runtime and the console.

pub mod notes;
pub mod retry;
pub mod settings;
pub mod storage;
pub mod table;
