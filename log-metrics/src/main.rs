mod analytics;
mod ingest;
mod invariants;
mod models;
mod parser;

use std::path::PathBuf;
use std::process::ExitCode;

use analytics::aggregate;
use clap::Parser;
use ingest::load_folder;
use models::{AccessRecord, MetricsReport};
use num_format::{Locale, ToFormattedString};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing .log access-log files
    folder: PathBuf,

    /// Entries per ranking table
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Parsed records to preview before the report
    #[arg(long, default_value_t = 5)]
    preview: usize,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let records = match load_folder(&args.folder).await {
        Ok(records) => records,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(report) = aggregate(&records, args.top) else {
        println!("No log data found");
        return ExitCode::SUCCESS;
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("report serializes")
        );
    } else {
        print_preview(&records, args.preview);
        print_report(&report, args.top);
    }
    ExitCode::SUCCESS
}

fn print_preview(records: &[AccessRecord], preview: usize) {
    println!(
        "Parsed {} records",
        records.len().to_formatted_string(&Locale::en)
    );
    for record in records.iter().take(preview) {
        let timestamp = record
            .timestamp
            .map_or_else(|| "-".to_string(), |ts| ts.to_string());
        println!(
            "  {timestamp} {} {} {} {}B {}ms",
            record.method,
            record.endpoint,
            record.status,
            record.response_size_bytes,
            record.response_time_ms,
        );
    }
}

fn print_report(report: &MetricsReport, top: usize) {
    println!();
    println!("Overall API calls/sec: {:.4}", report.calls_per_second);
    println!(
        "Average response time/sec (ms): {:.2}",
        report.avg_response_time_per_second
    );
    print_table(
        &format!("Top {top} APIs by average response time (ms)"),
        &report.top_by_avg_response_time,
        |v| format!("{v:.2}"),
    );
    print_table(
        &format!("Top {top} APIs by max response time (ms)"),
        &report.top_by_max_response_time,
        u64::to_string,
    );
    print_table(
        &format!("Top {top} APIs by max response size (bytes)"),
        &report.top_by_max_response_size,
        u64::to_string,
    );
    print_table(
        &format!("Top {top} APIs by most calls"),
        &report.top_by_call_count,
        usize::to_string,
    );
}

fn print_table<T>(title: &str, rows: &[(String, T)], fmt: impl Fn(&T) -> String) {
    println!("\n{title}");
    for (endpoint, value) in rows {
        println!("  {endpoint:<40} {}", fmt(value));
    }
}
