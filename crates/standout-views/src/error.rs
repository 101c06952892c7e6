//! Error types for view rendering.
//!
//! This module provides [`ViewError`], the error type for every fallible
//! operation in the crate. Failures are never recovered locally: they carry
//! the path that was being read or walked and are handed back to the caller
//! (typically an HTTP layer) to turn into a response.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for view rendering operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A template file could not be read.
    #[error("failed to read \"{}\": {source}", .path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The partials directory could not be walked.
    #[error("failed to walk \"{}\": {source}", .path.display())]
    Walk {
        /// Directory that failed to walk.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template file is not valid UTF-8.
    #[error("template \"{}\" is not valid UTF-8: {source}", .path.display())]
    Decode {
        /// Path of the undecodable file.
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Template syntax error, or a failure while the template was executing
    /// (undefined value in strict mode, helper error, missing include).
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_yaml::Error> for ViewError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewError::Config(err.to_string())
    }
}

impl ViewError {
    /// Returns true when the error is a missing file or directory.
    ///
    /// Useful for translating a missing view into a 404 rather than a 500.
    pub fn is_not_found(&self) -> bool {
        match self {
            ViewError::Io { source, .. } | ViewError::Walk { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            ViewError::Template(err) => err.kind() == minijinja::ErrorKind::TemplateNotFound,
            _ => false,
        }
    }
}
