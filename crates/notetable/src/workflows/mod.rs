//! The three notes workflows.
//!
//! Each workflow takes an injected `NoteStore`, issues its remote calls one at
//! a time and writes progress lines to the supplied writer.

mod load;
mod provision;
mod retry;
mod scan;

pub use load::{load_notes, read_records};
pub use provision::{create_table, wait_until_active};
pub use scan::{print_pages, scan_pages};

use notetable_core::retry::Backoff;

use crate::shutdown::Shutdown;

/// Cancellation and retry settings shared by every remote call in a workflow.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub shutdown: Shutdown,
    pub retry: Backoff,
}

impl WorkflowContext {
    pub fn new(shutdown: Shutdown, retry: Backoff) -> Self {
        Self { shutdown, retry }
    }
}
