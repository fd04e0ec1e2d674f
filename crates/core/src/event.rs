use crate::bot::TradingMode;
use crate::command::CommandEnvelope;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// Snapshot telemetry pushed by a bot process.
///
/// Everything but `bot_id` is optional: bots report whatever subset they
/// know. Snapshots are last-write-wins with no sequence numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub bot_id: String,
    #[serde(default)]
    pub running: Option<bool>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub selected_pair: Option<String>,
    #[serde(default)]
    pub trading_mode: Option<TradingMode>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

/// Transient notification payload carrying at least a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Notice {
    #[serde(default)]
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Bot-side acknowledgement of a previously broadcast command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandAck {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Frames a bot process sends to the relay, tagged by channel name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    BotStatus(StatusReport),
    NewSignal(Signal),
    BotInitialized(Notice),
    CommandResponse(CommandAck),
    Error(Notice),
}

/// Frames the relay fans out to every connected party. There is no replay
/// buffer: a subscriber only sees frames published while it is attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RelayFrame {
    BotCommand(CommandEnvelope),
    NewSignal(Signal),
    BotInitialized(Notice),
    CommandResponse(CommandAck),
    Error(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use serde_json::json;

    #[test]
    fn bot_status_frame_parses_with_partial_fields() {
        let event: InboundEvent = serde_json::from_value(json!({
            "event": "bot_status",
            "data": {"bot_id": "Alpha", "running": true, "selected_pair": "BTCUSD"}
        }))
        .unwrap();
        let InboundEvent::BotStatus(report) = event else {
            panic!("expected bot_status");
        };
        assert_eq!(report.bot_id, "Alpha");
        assert_eq!(report.running, Some(true));
        assert_eq!(report.selected_pair.as_deref(), Some("BTCUSD"));
        assert!(report.balance.is_none());
    }

    #[test]
    fn command_response_frame_round_trips() {
        let event: InboundEvent = serde_json::from_value(json!({
            "event": "command_response",
            "data": {"success": false, "message": "pair not tradable"}
        }))
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::CommandResponse(CommandAck {
                success: false,
                message: "pair not tradable".to_string(),
            })
        );
    }

    #[test]
    fn relay_frame_serializes_channel_tag() {
        let frame = RelayFrame::BotCommand(CommandEnvelope {
            bot_id: "Gamma".to_string(),
            cmd: CommandKind::StopBot,
            val: serde_json::Value::Null,
        });
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["event"], "bot_command");
        assert_eq!(json["data"]["cmd"], "stop_bot");
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let result = serde_json::from_value::<InboundEvent>(json!({
            "event": "shutdown_everything",
            "data": {}
        }));
        assert!(result.is_err());
    }
}
