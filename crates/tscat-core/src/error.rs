use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::key::MessageKey;
use crate::model::TranslationStatus;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors produced by the build-time catalog pipeline.
///
/// Runtime lookups never produce these; see `tscat-lookup`.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted data is malformed or misses a mandatory field.
    #[error("schema error at byte {position}: {message}")]
    Schema { message: String, position: u64 },

    /// An extraction reported the same identity key twice in one context.
    #[error("duplicate message in extraction: {key}")]
    Reconcile { key: MessageKey },

    /// A translator edit was refused.
    #[error("cannot edit {key}: {reason}")]
    Edit { key: MessageKey, reason: EditRefusal },
}

/// Why a translator edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditRefusal {
    #[error("no such message")]
    UnknownMessage,
    #[error("message is {0}")]
    Tombstoned(TranslationStatus),
}

impl CatalogError {
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn schema(message: impl Into<String>, position: u64) -> Self {
        Self::Schema {
            message: message.into(),
            position,
        }
    }

    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}
