// src/error.rs
// =============================================================================
// Errors that stop a scan before it starts.
//
// Everything that can go wrong *during* a scan (bad URL, dead host, failed
// write to the output file) is reported on the console and the scan keeps
// going, so none of those show up here.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// --threads was zero, negative or unreasonably large
    #[error("thread count must be between 1 and {max} (got {0})", max = crate::scan::MAX_THREADS)]
    InvalidThreads(i64),

    /// The URL list could not be opened
    #[error("failed to open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The output file could not be created or truncated
    #[error("failed to create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// reqwest refused to build a client (bad TLS backend, etc.)
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
