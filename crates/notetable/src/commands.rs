//! Subcommands, one per workflow.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use notetable_core::retry::{Backoff, WaitPolicy};
use notetable_core::settings::Settings;
use notetable_core::storage::NoteStore;
use notetable_core::table::format_definition;

use crate::config;
use crate::error::Result;
use crate::prelude::*;
use crate::workflows::{
    create_table, load_notes, print_pages, read_records, scan_pages, wait_until_active,
    WorkflowContext,
};

/// Available workflows.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Create the notes table and wait until it is active.
    CreateTable(CreateTableCommand),

    /// Load notes from a JSON file into the table.
    Load(LoadCommand),

    /// Print the table contents page by page.
    Scan(ScanCommand),
}

/// Create the table described in the settings file.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Create the notes table and wait until it is active.

The table uses the partition key (string) and sort key (number) named in the
settings file, with provisioned read and write capacity.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct CreateTableCommand {
    /// Give up if the table is not active after this many seconds.
    #[arg(long, default_value = "300")]
    pub max_wait_secs: u64,

    /// Give up after this many status checks.
    #[arg(long, default_value_t = Backoff::table_poll().max_attempts)]
    pub poll_attempts: u32,
}

/// Load notes into the table.
#[derive(Debug, clap::Parser)]
pub struct LoadCommand {
    /// Notes file to load (defaults to `Sourcenotes` from the settings).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Scan the table in fixed-size pages.
#[derive(Debug, clap::Parser)]
pub struct ScanCommand {
    /// Notes per page (defaults to `PageSize` from the settings).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,
}

/// Main entry point for the workflow subcommands.
pub async fn run(
    command: Commands,
    global: &crate::Global,
    settings: &Settings,
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
) -> Result<()> {
    let mut out = Output::new(global, anstream::stdout(), anstream::stdout());
    match command {
        Commands::CreateTable(cmd) => run_create_table(cmd, settings, store, ctx, &mut out).await,
        Commands::Load(cmd) => run_load(cmd, settings, store, ctx, &mut out).await,
        Commands::Scan(cmd) => run_scan(cmd, settings, store, ctx, &mut out).await,
    }
}

/// Where a command writes.
///
/// Progress lines are dropped under `--silent`; scan data never is.
struct Output<'a> {
    progress: Box<dyn Write + 'a>,
    data: Box<dyn Write + 'a>,
}

impl<'a> Output<'a> {
    fn new(global: &crate::Global, progress: impl Write + 'a, data: impl Write + 'a) -> Self {
        let progress: Box<dyn Write + 'a> = if global.is_silent() {
            Box::new(io::sink())
        } else {
            Box::new(progress)
        };
        Self {
            progress,
            data: Box::new(data),
        }
    }
}

async fn run_create_table(
    cmd: CreateTableCommand,
    settings: &Settings,
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    out: &mut Output<'_>,
) -> Result<()> {
    let definition = settings.table_definition();

    writeln!(out.progress, "{}", p_c("Table Plan:"))?;
    for line in format_definition(&definition) {
        if line.starts_with('+') {
            writeln!(out.progress, "  {}", p_g(&line))?;
        } else {
            writeln!(out.progress, "  {}", line)?;
        }
    }
    writeln!(out.progress)?;

    create_table(store, ctx, &definition, &mut out.progress).await?;

    let policy = WaitPolicy {
        backoff: Backoff::table_poll().with_max_attempts(cmd.poll_attempts),
        max_wait: Duration::from_secs(cmd.max_wait_secs),
    };
    wait_until_active(store, ctx, &definition.name, &policy, &mut out.progress).await?;

    writeln!(out.progress, "{}", p_g("Table created successfully."))?;

    Ok(())
}

async fn run_load(
    cmd: LoadCommand,
    settings: &Settings,
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    out: &mut Output<'_>,
) -> Result<()> {
    let path = cmd
        .file
        .unwrap_or_else(|| config::source_notes_path(settings));

    writeln!(
        out.progress,
        "Loading {} table with data from file {}",
        settings.table_name,
        path.display()
    )?;

    let records = read_records(&path).await?;
    let outcome = load_notes(store, ctx, &settings.table_name, &records, &mut out.progress).await;

    if outcome.failure.is_some() {
        writeln!(
            out.progress,
            "{}",
            p_y(&format!(
                "Stopped after {} of {} notes; earlier notes stay in the table.",
                outcome.inserted,
                records.len()
            ))
        )?;
    }
    let inserted = outcome.into_result()?;

    writeln!(out.progress, "Finished loading notes from the JSON file.")?;
    writeln!(
        out.progress,
        "{}",
        p_g(&format!(
            "Loaded {} notes into {}.",
            inserted, settings.table_name
        ))
    )?;

    Ok(())
}

async fn run_scan(
    cmd: ScanCommand,
    settings: &Settings,
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    out: &mut Output<'_>,
) -> Result<()> {
    let page_size = cmd.page_size.unwrap_or(settings.page_size);

    writeln!(out.progress, "Scanning with pagination...")?;

    let summary = print_pages(
        scan_pages(store, ctx, &settings.table_name, page_size),
        &mut out.data,
    )
    .await?;

    writeln!(
        out.progress,
        "{}",
        p_g(&format!(
            "Scanned {} notes in {} pages.",
            summary.notes, summary.pages
        ))
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use notetable_core::notes::Note;
    use notetable_core::storage::StoreError;
    use notetable_core::table::TableStatus;

    use super::*;
    use crate::error::WorkflowError;
    use crate::storage::inmemory::{InMemoryStore, Operation};
    use crate::workflows::testing::{context, output};
    use crate::Global;

    fn settings(source_notes: &str) -> Settings {
        Settings {
            table_name: "Notes".to_string(),
            partition_key: "UserId".to_string(),
            sort_key: "NoteId".to_string(),
            read_capacity: 5,
            write_capacity: 5,
            source_notes: source_notes.to_string(),
            page_size: 3,
        }
    }

    fn global(silent: bool) -> Global {
        Global {
            silent,
            verbose: false,
        }
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "notetable-commands-{}-{}.json",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn notes(count: i64) -> Vec<Note> {
        (1..=count)
            .map(|n| Note::new("u1", n, format!("note {}", n)))
            .collect()
    }

    #[tokio::test]
    async fn test_create_table_reports_plan_and_success() {
        let store = InMemoryStore::new();
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(false), &mut progress, &mut data);

        let cmd = CreateTableCommand {
            max_wait_secs: 5,
            poll_attempts: 10,
        };
        run_create_table(cmd, &settings("notes.json"), &store, &context(), &mut out)
            .await
            .unwrap();
        drop(out);

        let lines = output(progress);
        assert!(lines.iter().any(|l| l.contains("+ Create table: Notes")));
        assert!(lines.iter().any(|l| l == "Table Status: ACTIVE"));
        assert!(lines.iter().any(|l| l.contains("Table created successfully.")));
        assert!(data.is_empty());
        assert_eq!(store.describe_table("Notes").await.unwrap(), TableStatus::Active);
    }

    #[tokio::test]
    async fn test_load_uses_file_override() {
        let store = InMemoryStore::with_notes("Notes", Vec::<Note>::new()).await;
        let path = temp_file(
            "override",
            r#"[{"UserId": "u1", "NoteId": "42", "Note": "hello"}]"#,
        );
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(false), &mut progress, &mut data);

        let cmd = LoadCommand {
            file: Some(path.clone()),
        };
        run_load(cmd, &settings("missing.json"), &store, &context(), &mut out)
            .await
            .unwrap();
        drop(out);

        let lines = output(progress);
        assert_eq!(
            lines[0],
            format!("Loading Notes table with data from file {}", path.display())
        );
        assert!(lines
            .iter()
            .any(|l| l == "Finished loading notes from the JSON file."));
        assert_eq!(store.notes("Notes").await, vec![Note::new("u1", 42, "hello")]);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_defaults_to_settings_path() {
        let store = InMemoryStore::with_notes("Notes", Vec::<Note>::new()).await;
        let path = temp_file("settings", r#"[{"UserId": "u2", "NoteId": "1", "Note": "x"}]"#);
        let settings = settings(&path.display().to_string());
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(true), &mut progress, &mut data);

        run_load(LoadCommand { file: None }, &settings, &store, &context(), &mut out)
            .await
            .unwrap();
        drop(out);

        assert_eq!(store.notes("Notes").await, vec![Note::new("u2", 1, "x")]);
        assert!(progress.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_partial_load_warns_and_fails() {
        let store = InMemoryStore::with_notes("Notes", Vec::<Note>::new()).await;
        let path = temp_file(
            "partial",
            r#"[{"UserId": "u1", "NoteId": "1", "Note": "ok"}, {"UserId": "u1", "Note": "no id"}]"#,
        );
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(false), &mut progress, &mut data);

        let cmd = LoadCommand {
            file: Some(path.clone()),
        };
        let result = run_load(cmd, &settings("unused.json"), &store, &context(), &mut out).await;
        drop(out);

        assert!(matches!(result, Err(WorkflowError::FieldMissing { index: 1, .. })));
        let lines = output(progress);
        assert!(lines
            .iter()
            .any(|l| l.contains("Stopped after 1 of 2 notes; earlier notes stay in the table.")));
        assert!(!lines
            .iter()
            .any(|l| l == "Finished loading notes from the JSON file."));
        assert_eq!(store.notes("Notes").await, vec![Note::new("u1", 1, "ok")]);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_scan_page_size_override() {
        let store = InMemoryStore::with_notes("Notes", notes(3)).await;
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(false), &mut progress, &mut data);

        let cmd = ScanCommand { page_size: Some(2) };
        run_scan(cmd, &settings("notes.json"), &store, &context(), &mut out)
            .await
            .unwrap();
        drop(out);

        let data = output(data);
        assert!(data.iter().any(|l| l == "Start Page 2"));
        assert_eq!(data.iter().filter(|l| l.starts_with('{')).count(), 3);

        let progress = output(progress);
        assert_eq!(progress[0], "Scanning with pagination...");
        assert!(progress
            .iter()
            .any(|l| l.contains("Scanned 3 notes in 2 pages.")));
    }

    #[tokio::test]
    async fn test_silent_scan_still_prints_data() {
        let store = InMemoryStore::with_notes("Notes", notes(3)).await;
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(true), &mut progress, &mut data);

        run_scan(
            ScanCommand { page_size: None },
            &settings("notes.json"),
            &store,
            &context(),
            &mut out,
        )
        .await
        .unwrap();
        drop(out);

        assert!(progress.is_empty());
        assert_eq!(
            output(data),
            vec![
                "Start Page 1",
                r#"{"UserId":"u1","NoteId":"1","Note":"note 1"}"#,
                r#"{"UserId":"u1","NoteId":"2","Note":"note 2"}"#,
                r#"{"UserId":"u1","NoteId":"3","Note":"note 3"}"#,
                "End Page 1",
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_failure_propagates() {
        let store = InMemoryStore::with_notes("Notes", notes(3)).await;
        store
            .fail_next(Operation::Scan, StoreError::NotFound("Table not found: Notes".to_string()))
            .await;
        let (mut progress, mut data) = (Vec::new(), Vec::new());
        let mut out = Output::new(&global(false), &mut progress, &mut data);

        let result = run_scan(
            ScanCommand { page_size: None },
            &settings("notes.json"),
            &store,
            &context(),
            &mut out,
        )
        .await;
        drop(out);

        assert!(matches!(
            result,
            Err(WorkflowError::Remote(StoreError::NotFound(_)))
        ));
        assert!(data.is_empty());
    }
}
