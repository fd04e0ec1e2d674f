use serde::{Deserialize, Serialize};

/// Run state of a fleet member. Only ever transitions between these two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotRunStatus {
    Active,
    #[default]
    Inactive,
}

impl BotRunStatus {
    #[must_use]
    pub const fn from_running(running: bool) -> Self {
        if running {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    Passive,
    Semi,
    Auto,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    Active,
    Paused,
}

/// Durable record of one fleet member.
///
/// Field names follow the registry document schema on the wire, which mixes
/// camelCase with two legacy snake_case names (`selected_pair` is the pair
/// the dashboard picked, `assignedAssetSymbol` the pair last reported by the
/// bot process). `id` is a short human-chosen string ("Alpha") and is
/// immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: BotRunStatus,
    /// True only after a trusted remote process completed its handshake or
    /// sent its first status report. Never inferred from socket lifecycle.
    #[serde(default)]
    pub is_linked: bool,
    #[serde(default)]
    pub pnl: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub assigned_asset_symbol: Option<String>,
    #[serde(default)]
    pub selected_timeframe: Option<String>,
    #[serde(default)]
    pub investment: Option<f64>,
    #[serde(default)]
    pub trade_amount: Option<f64>,
    #[serde(default)]
    pub expiry: Option<i64>,
    #[serde(default)]
    pub payout: Option<f64>,
    #[serde(default)]
    pub martingale_enabled: Option<bool>,
    #[serde(default)]
    pub martingale_steps: Option<u32>,
    #[serde(default)]
    pub min_accuracy: Option<f64>,
    #[serde(default)]
    pub daily_stop_loss: Option<f64>,
    #[serde(default)]
    pub daily_take_profit: Option<f64>,
    #[serde(default)]
    pub trading_mode: Option<TradingMode>,
    #[serde(default)]
    pub pair_status: Option<PairStatus>,
    #[serde(rename = "selected_pair", default)]
    pub selected_pair: Option<String>,
}

impl Bot {
    /// Creates a bot record with defaults, as used when a bot process
    /// self-registers through its first status report.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            status: BotRunStatus::Inactive,
            is_linked: false,
            pnl: 0.0,
            accuracy: 0.0,
            color: None,
            strategy: None,
            assigned_asset_symbol: None,
            selected_timeframe: None,
            investment: None,
            trade_amount: None,
            expiry: None,
            payout: None,
            martingale_enabled: None,
            martingale_steps: None,
            min_accuracy: None,
            daily_stop_loss: None,
            daily_take_profit: None,
            trading_mode: None,
            pair_status: None,
            selected_pair: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_serializes_with_document_field_names() {
        let mut bot = Bot::new("Alpha");
        bot.is_linked = true;
        bot.assigned_asset_symbol = Some("BTCUSD".to_string());
        bot.selected_pair = Some("EURUSD_otc".to_string());
        bot.trading_mode = Some(TradingMode::Semi);

        let json = serde_json::to_value(&bot).unwrap();
        assert_eq!(json["isLinked"], true);
        assert_eq!(json["assignedAssetSymbol"], "BTCUSD");
        assert_eq!(json["selected_pair"], "EURUSD_otc");
        assert_eq!(json["tradingMode"], "semi");
        assert_eq!(json["status"], "inactive");
    }

    #[test]
    fn bot_deserializes_from_partial_document() {
        let bot: Bot = serde_json::from_str(r#"{"id":"Beta","status":"active"}"#).unwrap();
        assert_eq!(bot.id, "Beta");
        assert_eq!(bot.status, BotRunStatus::Active);
        assert!(!bot.is_linked);
        assert!(bot.selected_pair.is_none());
    }

    #[test]
    fn run_status_maps_from_running_flag() {
        assert_eq!(BotRunStatus::from_running(true), BotRunStatus::Active);
        assert_eq!(BotRunStatus::from_running(false), BotRunStatus::Inactive);
    }
}
