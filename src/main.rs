use::std::env;
use::std::process;

use bank_ledger::run;
use chrono::{DateTime, Utc};
use log::info;

fn main() {
    // Expecting the journal CSV path and optionally an RFC 3339 timestamp to scan from
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 && args.len() != 3 {
        eprintln!("Usage: {} <journal.csv> [since]", args[0]);
        process::exit(1);
    }
    let filename = &args[1];
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    let since = match args.get(2).map(|s| DateTime::parse_from_rfc3339(s)) {
        None => None,
        Some(Ok(since)) => Some(since.with_timezone(&Utc)),
        Some(Err(e)) => {
            eprintln!("Error: invalid since timestamp {:?}: {}", args[2], e);
            process::exit(1);
        }
    };

    info!("starting bank ledger with file: {}", filename);

    if let Err(e) = run(filename, since) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
