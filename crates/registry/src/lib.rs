pub mod error;
pub mod market;
pub mod registry;
pub mod signals;

pub use error::StoreError;
pub use registry::BotRegistry;
pub use signals::RECENT_SIGNALS_LIMIT;
