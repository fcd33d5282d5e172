//! `doi-batch`: batch-edit DOI metadata attributes.
//!
//! Usage:
//!   doi-batch apply --operations ops.json [--document attributes.json]
//!   doi-batch batch --operations ops.json --records records.json [--live [--yes]] [--output out.json]
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = doi_batch::cli::command().get_matches();
    if let Err(e) = doi_batch::cli::execute(&matches) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
