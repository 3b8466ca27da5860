//! Error types for the library.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted stylesheet.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Page stylesheet problems.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("CSS parse error: {0}")]
    Parse(String),
}

/// Box layout failures.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout error: {0}")]
    Taffy(String),
}

/// Errors surfaced by the editor session.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The backend could not be reached or refused the request.
    #[error("Failed to clear. Is the server running? ({0})")]
    ServerUnreachable(String),
    #[error("no element is selected")]
    NoSelection,
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Style(#[from] StyleError),
}

/// Errors starting or running the HTTP service.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),
}
