use crate::bus::Bus;
use crate::error::RelayError;
use nexus_core::{
    CommandEnvelope, CommandKind, CommandReceipt, CommandRequest, InboundEvent, RelayFrame,
};
use nexus_registry::BotRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Brokers commands and events between dashboards and bot processes.
///
/// Sole writer of the bot registry: dashboards submit commands, the relay
/// interprets them, persists what needs persisting, and republishes to the
/// broadcast domain. Persistence on the command path is best-effort — a
/// storage blip must not block live trading control, so the broadcast still
/// goes out and the failure is logged (the command is accepted but not
/// confirmed persisted).
pub struct RelayService {
    registry: Arc<BotRegistry>,
    bus: Bus,
}

impl RelayService {
    #[must_use]
    pub fn new(registry: Arc<BotRegistry>, bus: Bus) -> Self {
        Self { registry, bus }
    }

    #[must_use]
    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    #[must_use]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Attaches a subscriber to the outbound broadcast domain.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RelayFrame> {
        self.bus.subscribe()
    }

    /// Validates a dashboard-issued command against registry state, applies
    /// its state transition, and broadcasts it to every connected party.
    ///
    /// # Errors
    ///
    /// `BotNotFound` for an unknown id, `MissingPair` when `start_bot` or
    /// `manual_trade` cannot resolve a pair, `InvalidCommand` for a
    /// malformed payload. None of these emit a `bot_command` frame.
    pub async fn dispatch(
        &self,
        bot_id: &str,
        request: CommandRequest,
    ) -> Result<CommandReceipt, RelayError> {
        let bot = self
            .registry
            .find(bot_id)
            .await?
            .ok_or_else(|| RelayError::BotNotFound(bot_id.to_string()))?;

        let val = match request.command {
            CommandKind::StartBot => {
                // Payload pair wins; fall back to the stored selection.
                let pair = payload_pair(&request.value)
                    .or(bot.selected_pair)
                    .ok_or_else(|| RelayError::MissingPair(bot_id.to_string()))?;
                if let Err(err) = self.registry.mark_running(bot_id, &pair).await {
                    tracing::warn!("Start of bot {bot_id} accepted but not persisted: {err}");
                }
                // Broadcast the resolved pair, never the raw payload.
                json!({ "pair": pair })
            }
            CommandKind::StopBot => {
                if let Err(err) = self.registry.mark_stopped(bot_id).await {
                    tracing::warn!("Stop of bot {bot_id} accepted but not persisted: {err}");
                }
                request.value
            }
            CommandKind::FetchHistoricalData => {
                let pair = request
                    .value
                    .as_str()
                    .filter(|pair| !pair.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        RelayError::InvalidCommand(
                            "fetch_historical_data expects a pair string".to_string(),
                        )
                    })?;
                if let Err(err) = self.registry.set_selected_pair(bot_id, &pair).await {
                    tracing::warn!("Pair for bot {bot_id} accepted but not persisted: {err}");
                }
                request.value
            }
            CommandKind::ManualTrade => {
                // Fire-and-forget: no registry mutation.
                if payload_pair(&request.value).is_none() {
                    return Err(RelayError::MissingPair(bot_id.to_string()));
                }
                request.value
            }
        };

        let audience = self.bus.publish(RelayFrame::BotCommand(CommandEnvelope {
            bot_id: bot_id.to_string(),
            cmd: request.command,
            val,
        }));
        tracing::info!(
            "Command {} sent to {} ({} subscribers)",
            request.command,
            bot_id,
            audience
        );

        Ok(CommandReceipt::sent(request.command))
    }

    /// Ingests a bot-originated event: reconciles status snapshots into the
    /// registry and republishes everything else to the dashboard audience.
    ///
    /// # Errors
    ///
    /// Returns a storage error when a status snapshot cannot be reconciled;
    /// the transport layer logs and drops it, since no request is waiting.
    pub async fn ingest(&self, event: InboundEvent) -> Result<(), RelayError> {
        match event {
            InboundEvent::BotStatus(report) => {
                let bot = self.registry.apply_status(&report).await?;
                tracing::debug!("Reconciled status for bot {}", bot.id);
            }
            InboundEvent::NewSignal(signal) => {
                if let Err(err) = self.registry.upsert_signal(&signal).await {
                    tracing::warn!("Signal {} accepted but not persisted: {err}", signal.id);
                }
                self.bus.publish(RelayFrame::NewSignal(signal));
            }
            InboundEvent::BotInitialized(notice) => {
                self.bus.publish(RelayFrame::BotInitialized(notice));
            }
            InboundEvent::CommandResponse(ack) => {
                self.bus.publish(RelayFrame::CommandResponse(ack));
            }
            InboundEvent::Error(notice) => {
                self.bus.publish(RelayFrame::Error(notice));
            }
        }
        Ok(())
    }
}

fn payload_pair(value: &Value) -> Option<String> {
    value
        .get("pair")
        .and_then(Value::as_str)
        .filter(|pair| !pair.is_empty())
        .map(str::to_string)
}
