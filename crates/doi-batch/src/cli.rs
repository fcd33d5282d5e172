//! Core logic of the `doi-batch` command-line tool.
//!
//! - `doi-batch apply`: run operations on one attribute document
//! - `doi-batch batch`: run operations over a file of DOI records

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use doi_batch_engine::{compile_batch, parse_operations, run, BatchError};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::driver::{BatchDriver, BatchSummary, LiveConfirmation, RunMode};
use crate::error::StoreError;
use crate::record::RecordSummary;
use crate::store::{JsonFileStore, DEFAULT_PAGE_SIZE};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Batch(#[from] BatchError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Live update cancelled: not confirmed.")]
    NotConfirmed,
}

pub fn command() -> Command {
    Command::new("doi-batch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Batch-edit DOI metadata attributes with path/regex operations")
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .about("Apply operations to one attribute document (stdin by default)")
                .arg(operations_arg())
                .arg(
                    Arg::new("document")
                        .long("document")
                        .short('d')
                        .value_parser(value_parser!(PathBuf))
                        .help("Attribute document JSON file"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Apply operations to every record in a JSON:API records file")
                .arg(operations_arg())
                .arg(
                    Arg::new("records")
                        .long("records")
                        .short('r')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Records file (`{\"data\": [...]}` or an array of resources)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the records after a live run"),
                )
                .arg(
                    Arg::new("page_size")
                        .long("page-size")
                        .value_parser(value_parser!(usize))
                        .default_value("25")
                        .help("Records fetched per page"),
                )
                .arg(
                    Arg::new("live")
                        .long("live")
                        .action(ArgAction::SetTrue)
                        .help("Persist changes instead of a dry run"),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Confirm a live run without prompting"),
                ),
        )
}

fn operations_arg() -> Arg {
    Arg::new("operations")
        .long("operations")
        .short('p')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of operations")
}

// ── apply ─────────────────────────────────────────────────────────────────

/// Run operations on one attribute document and render the outcome as
/// `{"updated": .., "log": [..], "attributes": {..}}`.
pub fn apply_document(document: &str, operations: &str) -> Result<String, CliError> {
    let specs = parse_operations(operations)?;
    let operations = compile_batch(&specs)?;
    let mut attributes: Value = serde_json::from_str(document)?;
    let report = run(&mut attributes, &operations);
    let out = json!({
        "updated": report.updated,
        "log": report.log,
        "attributes": attributes,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

// ── batch ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub operations: PathBuf,
    pub records: PathBuf,
    pub output: Option<PathBuf>,
    pub page_size: usize,
    pub live: bool,
    pub assume_yes: bool,
}

impl BatchOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            operations: matches.get_one::<PathBuf>("operations").cloned().unwrap_or_default(),
            records: matches.get_one::<PathBuf>("records").cloned().unwrap_or_default(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            page_size: matches.get_one::<usize>("page_size").copied().unwrap_or(DEFAULT_PAGE_SIZE),
            live: matches.get_flag("live"),
            assume_yes: matches.get_flag("yes"),
        }
    }
}

/// Validate operations, confirm a live run, then drive the batch.
///
/// `ask` is only called for a live run without `assume_yes`; it returns
/// the operator's answer to the confirmation prompt.
pub fn run_batch<F>(options: &BatchOptions, ask: F) -> Result<(BatchSummary, JsonFileStore), CliError>
where
    F: FnOnce() -> io::Result<String>,
{
    let specs = parse_operations(&fs::read_to_string(&options.operations)?)?;
    let operations = compile_batch(&specs)?;
    let mut store = JsonFileStore::open(&options.records, options.page_size)?;

    let mode = if !options.live {
        RunMode::DryRun
    } else if options.assume_yes {
        RunMode::Live(LiveConfirmation::granted())
    } else {
        let answer = ask()?;
        RunMode::Live(LiveConfirmation::from_answer(&answer).ok_or(CliError::NotConfirmed)?)
    };

    let summary = BatchDriver::new(&operations, mode).run(&mut store)?;
    if let (false, Some(output)) = (summary.dry_run, &options.output) {
        store.save(output)?;
        info!(path = %output.display(), "records written");
    }
    Ok((summary, store))
}

fn prompt_confirmation() -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "You are about to perform a live update. This will permanently modify records. Proceed? [y/N] "
    )?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

/// Render the summary followed by one line per affected or updated record.
pub fn render_summary(summary: &BatchSummary, store: &JsonFileStore) -> String {
    let mut out = summary.lines().join("\n");
    let (ids, label) = if summary.dry_run {
        (&summary.affected, "Dry Run")
    } else {
        (&summary.updated, "Updated")
    };
    for id in ids {
        let title = store
            .records()
            .iter()
            .find(|r| r.display_id() == id)
            .map(|r| RecordSummary::from_record(r).title)
            .unwrap_or_default();
        out.push_str(&format!("\n{id}\t{label}\t{title}"));
    }
    for id in &summary.failed {
        out.push_str(&format!("\n{id}\tFailed"));
    }
    out
}

// ── entry point ───────────────────────────────────────────────────────────

pub fn execute(matches: &ArgMatches) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    match matches.subcommand() {
        Some(("apply", sub)) => {
            let operations_path = sub.get_one::<PathBuf>("operations").cloned().unwrap_or_default();
            let operations = fs::read_to_string(operations_path)?;
            let document = match sub.get_one::<PathBuf>("document") {
                Some(path) => fs::read_to_string(path)?,
                None => io::read_to_string(io::stdin())?,
            };
            writeln!(stdout, "{}", apply_document(document.trim(), &operations)?)?;
        }
        Some(("batch", sub)) => {
            let options = BatchOptions::from_matches(sub);
            let (summary, store) = run_batch(&options, prompt_confirmation)?;
            writeln!(stdout, "{}", render_summary(&summary, &store))?;
        }
        _ => {}
    }
    Ok(())
}
