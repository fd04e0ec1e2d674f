use thiserror::Error;

/// Failures surfaced by the registry store.
///
/// `Unavailable` covers every transport-level storage failure; callers are
/// expected to log and keep serving rather than crash the relay process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt document: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("invalid update for bot {id}: {reason}")]
    InvalidUpdate { id: String, reason: String },
}
