//! Paginated scanning of the notes table.

use std::io::Write;

use notetable_core::notes::Page;
use notetable_core::storage::{NoteStore, ScanCursor, ScanOutput};
use tokio_stream::{Stream, StreamExt};

use super::retry::with_retry;
use super::WorkflowContext;
use crate::error::Result;

/// Counts reported after printing a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub pages: usize,
    pub notes: usize,
}

/// Lazily scans `table_name` in pages of at most `page_size` notes.
///
/// Nothing is fetched until the stream is polled, and each poll issues at
/// most one Scan call. The stream ends after the page that carries no
/// continuation token, or after the first error.
pub fn scan_pages<'a>(
    store: &'a dyn NoteStore,
    ctx: &'a WorkflowContext,
    table_name: &'a str,
    page_size: u32,
) -> impl Stream<Item = Result<Page>> + 'a {
    async_stream::stream! {
        let mut start: Option<ScanCursor> = None;
        let mut calls = 0usize;

        loop {
            let cursor = start.take();
            let result = with_retry(ctx, "Scan", || {
                store.scan_page(table_name, page_size, cursor.clone())
            })
            .await;
            calls += 1;

            match result {
                Ok(ScanOutput { notes, next }) => {
                    tracing::debug!(
                        table = %table_name,
                        calls,
                        count = notes.len(),
                        has_more = next.is_some(),
                        "Scanned page"
                    );
                    let has_more = next.is_some();
                    yield Ok(Page { notes, has_more });

                    match next {
                        Some(next) => start = Some(next),
                        None => break,
                    }
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    }
}

/// Prints every non-empty page framed by `Start Page N` / `End Page N`.
///
/// Empty pages do not advance the page counter.
pub async fn print_pages<S>(pages: S, out: &mut impl Write) -> Result<ScanSummary>
where
    S: Stream<Item = Result<Page>>,
{
    tokio::pin!(pages);
    let mut summary = ScanSummary::default();

    while let Some(page) = pages.next().await {
        let page = page?;
        if page.is_empty() {
            continue;
        }

        summary.pages += 1;
        summary.notes += page.len();

        writeln!(out, "Start Page {}", summary.pages)?;
        for note in &page.notes {
            writeln!(out, "{}", note.to_json_line())?;
        }
        writeln!(out, "End Page {}", summary.pages)?;
    }

    Ok(summary)
}
