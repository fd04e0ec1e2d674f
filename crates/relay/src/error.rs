use nexus_registry::StoreError;
use thiserror::Error;

/// Failures on the relay's command path.
///
/// Validation failures (`BotNotFound`, `MissingPair`, `InvalidCommand`)
/// happen before any broadcast side effect: a rejected command never emits
/// a `bot_command` frame.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("bot {0} not found")]
    BotNotFound(String),

    #[error("no trading pair selected for bot {0}")]
    MissingPair(String),

    #[error("invalid command payload: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
