/// Failures reported by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable in this context")]
    Unavailable,

    #[error("storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}
