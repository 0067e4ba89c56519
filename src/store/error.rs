//! Error taxonomy for store operations.

use thiserror::Error;

/// Every failure a store operation can report.
///
/// The first four variants are caused by the caller's input and map to 4xx
/// responses; the rest are server faults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {name}: not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} {name}: already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid filename {0} (must be letters, digits and hyphens ending in .md)")]
    InvalidFilename(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn already_exists(kind: &'static str, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// `true` for errors caused by the request rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AlreadyExists { .. }
                | Self::Validation(_)
                | Self::InvalidFilename(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
