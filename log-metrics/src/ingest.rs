use std::path::{Path, PathBuf};

use futures_util::future;
use tracing::debug;

use crate::{models::AccessRecord, parser::parse_line};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("log folder {} is not readable", .path.display())]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .log files found in {}", .0.display())]
    NoLogFiles(PathBuf),

    #[error("failed to read {}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid folder pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("parse task failed")]
    Worker(#[from] tokio::task::JoinError),
}

/// Reads every `.log` file in `folder` and parses it into access records.
/// Files parse concurrently; the returned dataset preserves line order
/// within each file and sorted file order across files.
pub async fn load_folder(folder: &Path) -> Result<Vec<AccessRecord>, IngestError> {
    let files = discover_log_files(folder)?;
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| tokio::spawn(parse_file(path)))
        .collect();

    let mut records = Vec::new();
    for batch in future::try_join_all(handles).await? {
        records.extend(batch?);
    }
    Ok(records)
}

fn discover_log_files(folder: &Path) -> Result<Vec<PathBuf>, IngestError> {
    folder
        .read_dir()
        .map_err(|source| IngestError::FolderUnreadable {
            path: folder.to_path_buf(),
            source,
        })?;

    let pattern = folder.join("*.log");
    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(IngestError::FileRead {
                    path,
                    source: e.into_error(),
                });
            }
        }
    }
    if files.is_empty() {
        return Err(IngestError::NoLogFiles(folder.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

async fn parse_file(path: PathBuf) -> Result<Vec<AccessRecord>, IngestError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| IngestError::FileRead {
            path: path.clone(),
            source,
        })?;
    // Malformed byte sequences degrade to replacement characters; a bad
    // line never aborts the rest of the file.
    let text = String::from_utf8_lossy(&bytes);

    let mut seen = 0usize;
    let records: Vec<_> = text
        .lines()
        .inspect(|_| seen += 1)
        .filter_map(parse_line)
        .collect();
    debug!(
        file = %path.display(),
        lines = seen,
        records = records.len(),
        "parsed log file"
    );
    Ok(records)
}
