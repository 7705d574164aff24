use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "log-seeder")]
#[command(about = "Generate folders of fake access-log files for testing", long_about = None)]
pub struct CliArgs {
    /// Folder to write .log files into (created if missing)
    folder: PathBuf,

    #[arg(long, default_value_t = 3)]
    files: usize,

    #[arg(long, default_value_t = 1000)]
    lines: usize,
}
