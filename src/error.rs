use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run. Every variant names the offending input.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("malformed input in {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("invalid window size {0}: must be at least 1")]
    InvalidWindow(usize),

    #[error("no numeric columns to smooth")]
    EmptyTable,

    #[error("unsupported output format: {} (expected .png or .svg)", path.display())]
    UnsupportedOutput { path: PathBuf },

    #[error("unsupported export format: {} (expected .csv or .json)", path.display())]
    UnsupportedExport { path: PathBuf },

    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PlotError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PlotError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
