use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}
