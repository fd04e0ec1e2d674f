pub mod bot;
pub mod command;
pub mod config;
pub mod config_loader;
pub mod event;
pub mod market;
pub mod signal;

pub use bot::{Bot, BotRunStatus, PairStatus, TradingMode};
pub use command::{CommandEnvelope, CommandKind, CommandReceipt, CommandRequest};
pub use config::{AppConfig, DatabaseConfig, RelayConfig, ServerConfig};
pub use config_loader::ConfigLoader;
pub use event::{CommandAck, InboundEvent, Notice, RelayFrame, StatusReport};
pub use market::{Candle, MarketAsset};
pub use signal::{Signal, SignalDirection, SignalResult};
