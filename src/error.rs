//! Crate-level error types.
//!
//! Fetch failures carry their own taxonomy in [`crate::traits::FetchError`];
//! this module adds the durable-store errors and the binary-facing roll-up.

use std::path::PathBuf;

use thiserror::Error;

use crate::traits::FetchError;

/// Durable-store failures.
///
/// The public store API reports these as logged `false`/`None` results;
/// the typed variants exist for the internal paths and the roll-up.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("storage io at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized for writing.
    #[error("storage encode: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Everything that can abort a run, rolled up for the binary.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Command line arguments could not be parsed.
    #[error("{0}")]
    Usage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_io_display_includes_path() {
        let err = StorageError::io(
            "/tmp/deck/user.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = err.to_string();
        assert!(display.contains("/tmp/deck/user.json"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_fetch_error_rolls_up_transparently() {
        let err: DeckError = FetchError::Status {
            status: 503,
            message: "scheduler offline".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Server error (503): scheduler offline");
    }

    #[test]
    fn test_usage_error_display() {
        let err = DeckError::Usage("unknown flag: --bogus".to_string());
        assert_eq!(err.to_string(), "unknown flag: --bogus");
    }
}
