use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
    Call,
    Put,
}

/// Outcome of a signal. Transitions `Pending -> {Win, Loss}` exactly once;
/// a settled result is never demoted back to `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalResult {
    Win,
    Loss,
    #[default]
    Pending,
}

impl SignalResult {
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A timestamped trade recommendation emitted by a bot process.
///
/// Immutable once persisted except for `result`. `accuracy` accepts the
/// legacy `confidence` wire name from older bot builds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub id: String,
    #[serde(rename = "botId")]
    pub bot_id: String,
    #[serde(rename = "type")]
    pub direction: SignalDirection,
    pub pair: String,
    pub price: f64,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default, alias = "confidence")]
    pub accuracy: f64,
    /// Epoch milliseconds, assigned by the emitting bot.
    pub timestamp: i64,
    #[serde(default)]
    pub result: SignalResult,
}
