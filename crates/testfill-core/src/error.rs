//! # Error Types
//!
//! Every error in this crate is fatal at the command-line level: a walk
//! root that does not exist, a test path that is not a regular file, or a
//! document that cannot be parsed leaves nothing meaningful to format or
//! validate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering, reading, or writing test documents.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The path does not name a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// The discovery root does not name a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// Reading or writing the file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Parser error, carrying line and column.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a document to canonical text failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
