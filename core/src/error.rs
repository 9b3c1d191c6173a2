use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Everything that can go wrong between invoking nmap and returning hosts.
///
/// All variants are terminal for the scan that raised them; the library
/// never retries on its own.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The configured binary did not answer the construction-time probe
    /// with a zero exit code.
    #[error("`{executable}` is not executable")]
    ExecutableNotFound { executable: String },

    /// The external process exited non-zero, could not be spawned, or was
    /// killed when the timeout elapsed.
    #[error("failed to execute `{command}`: {stderr}")]
    ProcessExecution { command: String, stderr: String },

    /// The process reported success but never wrote the report file.
    #[error("output file not found ({path:?})")]
    MissingOutput { path: PathBuf },

    /// The report file exists but does not follow the expected schema.
    #[error("malformed nmap report: {reason}")]
    MalformedReport { reason: String },
}

impl ScanError {
    pub(crate) fn malformed(reason: impl ToString) -> Self {
        Self::MalformedReport {
            reason: reason.to_string(),
        }
    }
}
