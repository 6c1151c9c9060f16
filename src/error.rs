//! Error types for netlify-sso

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for netlify-sso
pub type Result<T> = std::result::Result<T, Error>;

/// netlify-sso errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static asset could not be installed
    #[error("Asset error: {0}")]
    Asset(String),

    /// IO error on a file or directory
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// `netlify.toml` could not be parsed
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// `netlify.toml` could not be serialized
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Error {
    /// Create an IO error for `path`
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an asset error naming both ends of a failed copy
    pub fn asset(
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
        source: impl std::fmt::Display,
    ) -> Self {
        Self::Asset(format!("{from} -> {to}: {source}"))
    }
}
