use std::path::{Path, PathBuf};

use thiserror::Error;
use tscat_core::CatalogError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {}", .problems.join("; "))]
    InvalidConfig { problems: Vec<String> },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | I/O failure |
    /// | 2 | bad arguments or configuration |
    /// | 3 | malformed catalog or extraction list |
    /// | 4 | duplicate key in an extraction |
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Catalog(CatalogError::Io { .. }) => 1,
            Self::ConfigParse { .. } | Self::InvalidConfig { .. } | Self::InvalidArgument { .. } => {
                2
            }
            Self::Json { .. } | Self::Catalog(CatalogError::Schema { .. }) => 3,
            Self::Catalog(CatalogError::Reconcile { .. }) => 4,
            Self::Catalog(CatalogError::Edit { .. }) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
