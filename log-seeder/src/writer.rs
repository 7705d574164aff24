use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::generator::generate_access_log;

/// Writes one log file of `lines` entries with timestamps advancing one
/// second per line from `start`, so a seeded corpus always spans a
/// non-degenerate aggregation window.
pub fn write_log_file<R: Rng + ?Sized>(
    path: &Path,
    start: NaiveDateTime,
    lines: usize,
    rng: &mut R,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for i in 0..lines {
        let stamp = start + Duration::seconds(i as i64);
        writeln!(out, "{}", generate_access_log(rng, stamp))?;
    }
    out.flush()
}
