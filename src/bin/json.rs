//! Print everything decoded from a game state file as JSON
//!
//! ```text
//! json [path/to/userGameState.cgs]
//! ```
//!
//! Every entry is materialized. Exit codes match `cgsinfo`.

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

    let path = args.get(1).map(PathBuf::from);
    let result = cgs::resolve_path(path)
        .and_then(|path| cgs::read_file(path))
        .and_then(|data| cgs::decode(&data));

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.kind().exit_code());
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = serde_json::to_writer_pretty(&mut handle, &report)
        .map_err(io::Error::from)
        .and_then(|_| writeln!(handle));

    if let Err(e) = written {
        eprintln!("unable to write json: {}", e);
        process::exit(1);
    }
}
