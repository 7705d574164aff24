mod args;
mod generator;
mod writer;

use std::process::ExitCode;

use args::CliArgs;
use chrono::{Duration, Utc};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use writer::write_log_file;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(e) = std::fs::create_dir_all(args.folder()) {
        eprintln!("cannot create {}: {e}", args.folder().display());
        return ExitCode::FAILURE;
    }

    println!(
        "Writing {} files of {} lines to {}",
        args.files(),
        args.lines(),
        args.folder().display()
    );
    let mut rng = StdRng::from_os_rng();
    // Each file picks up where the previous one left off.
    let total_lines = args.files() * args.lines();
    let mut start = Utc::now().naive_utc() - Duration::seconds(total_lines as i64);
    for i in 0..*args.files() {
        let path = args.folder().join(format!("seed-{i}.log"));
        if let Err(e) = write_log_file(&path, start, *args.lines(), &mut rng) {
            eprintln!("failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        start += Duration::seconds(*args.lines() as i64);
    }
    ExitCode::SUCCESS
}
