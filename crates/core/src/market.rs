use serde::{Deserialize, Serialize};

/// One tradable asset as advertised by the trading platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketAsset {
    pub name: String,
    #[serde(default)]
    pub payout: f64,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub active: bool,
}

/// One OHLC bar, shared between bot uploads and dashboard chart reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}
