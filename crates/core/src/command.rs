use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Closed set of instructions a dashboard can issue toward a bot process.
/// Unknown command names are rejected at deserialization time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    StartBot,
    StopBot,
    ManualTrade,
    FetchHistoricalData,
}

impl CommandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartBot => "start_bot",
            Self::StopBot => "stop_bot",
            Self::ManualTrade => "manual_trade",
            Self::FetchHistoricalData => "fetch_historical_data",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP body of `POST /api/bots/:id/command`.
///
/// `value` is kind-dependent: an object with a `pair` for `start_bot` and
/// `manual_trade`, a bare pair string for `fetch_historical_data`, absent
/// for `stop_bot`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: CommandKind,
    #[serde(default)]
    pub value: Value,
}

/// Envelope broadcast on the `bot_command` channel. Addressing is advisory:
/// every connected party receives the frame and bots filter on `bot_id`
/// themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandEnvelope {
    pub bot_id: String,
    pub cmd: CommandKind,
    pub val: Value,
}

/// Synchronous acknowledgement returned to the HTTP caller once a command
/// has been handed to the broadcast channel. Says nothing about delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReceipt {
    pub success: bool,
    pub message: String,
}

impl CommandReceipt {
    #[must_use]
    pub fn sent(kind: CommandKind) -> Self {
        Self {
            success: true,
            message: format!("Command {kind} sent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_kind_uses_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&CommandKind::FetchHistoricalData).unwrap(),
            r#""fetch_historical_data""#
        );
        let kind: CommandKind = serde_json::from_str(r#""start_bot""#).unwrap();
        assert_eq!(kind, CommandKind::StartBot);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result = serde_json::from_str::<CommandKind>(r#""self_destruct""#);
        assert!(result.is_err());
    }

    #[test]
    fn request_value_defaults_to_null() {
        let req: CommandRequest = serde_json::from_str(r#"{"command":"stop_bot"}"#).unwrap();
        assert_eq!(req.command, CommandKind::StopBot);
        assert!(req.value.is_null());
    }

    #[test]
    fn envelope_matches_socket_payload_shape() {
        let envelope = CommandEnvelope {
            bot_id: "Alpha".to_string(),
            cmd: CommandKind::StartBot,
            val: json!({"pair": "EURUSD_otc"}),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            json!({"bot_id": "Alpha", "cmd": "start_bot", "val": {"pair": "EURUSD_otc"}})
        );
    }
}
