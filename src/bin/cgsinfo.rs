//! Summarize a Cities: Skylines game state file
//!
//! ```text
//! cgsinfo [path/to/userGameState.cgs]
//! ```
//!
//! Without a path the game's default location for this platform is used.
//! Anomalies found while decoding are listed in the summary but do not cause a
//! failing exit code. Set `RUST_LOG=debug` to trace the decode on stderr.

use cgs::summary::{Summary, SummaryOptions};
use cgs::{DecodeOptions, Decoder};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [file]", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(args.get(1).map(PathBuf::from)) {
        eprintln!("{}", e);
        process::exit(e.kind().exit_code());
    }
}

fn run(path: Option<PathBuf>) -> Result<(), cgs::Error> {
    let path = cgs::resolve_path(path)?;
    let data = cgs::read_file(&path)?;

    let summary_options = SummaryOptions::new();
    let options =
        DecodeOptions::new().with_max_materialized_entries(summary_options.materialization_cap());
    let report = Decoder::with_options(options).decode(&data)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    Summary::new(&report)
        .with_options(summary_options)
        .to_writer(&mut handle)?;
    handle.flush()?;
    Ok(())
}
