use std::path::PathBuf;
use thiserror::Error;

/// Errors detected at the boundary between the filesystem and the matching
/// core. A malformed dictionary line is never fatal — it's logged and
/// skipped in `dict::load` — only I/O failures surface here.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}
