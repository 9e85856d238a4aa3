use std::io;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid project id: {0}")]
    InvalidProjectId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt record {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    /// Map missing paths to `StoreError::NotFound`, everything else to `Io`
    pub(crate) fn from_io(what: &str, source: io::Error) -> Self {
        if is_missing(&source) {
            StoreError::NotFound(what.to_string())
        } else {
            StoreError::io(format!("accessing {}", what), source)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// The path doesn't exist, including when an ancestor is a regular file
pub(crate) fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
