use crate::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use nexus_core::{Bot, Candle, CommandReceipt, CommandRequest, MarketAsset, Signal};
use nexus_registry::RECENT_SIGNALS_LIMIT;
use nexus_relay::RelayService;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP", "timestamp": chrono::Utc::now() }))
}

/// Lists every bot in the registry. Dashboards call this on connect before
/// subscribing to the event stream (bootstrap-then-stream).
///
/// # Errors
/// Returns 500 with an error body if the registry is unavailable.
pub async fn list_bots(
    State(relay): State<Arc<RelayService>>,
) -> Result<Json<Vec<Bot>>, ApiError> {
    Ok(Json(relay.registry().list_all().await?))
}

/// One-time fleet bootstrap: inserts the given bots only when the registry
/// is empty, a no-op otherwise.
///
/// # Errors
/// Returns 400 when the body is not `{bots: [...]}`.
pub async fn sync_bots(
    State(relay): State<Arc<RelayService>>,
    Json(body): Json<Value>,
) -> Result<Json<AckResponse>, ApiError> {
    let bots = body
        .get("bots")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("Invalid bots data"))?;
    let bots: Vec<Bot> = bots
        .iter()
        .cloned()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|_| ApiError::bad_request("Invalid bots data"))?;

    relay.registry().seed_if_empty(&bots).await?;
    Ok(Json(AckResponse {
        success: true,
        message: "Sync complete".to_string(),
    }))
}

/// Merges partial fields into a bot document.
///
/// # Errors
/// Returns 404 for an unknown id, 400 when the merge result is not a valid
/// bot document.
pub async fn update_bot(
    State(relay): State<Arc<RelayService>>,
    Path(bot_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Bot>, ApiError> {
    let Some(updates) = body.as_object() else {
        return Err(ApiError::bad_request("Update body must be an object"));
    };

    let bot = relay
        .registry()
        .update_bot(&bot_id, updates)
        .await?
        .ok_or_else(|| ApiError::not_found("Bot not found"))?;
    Ok(Json(bot))
}

/// Validates and relays a dashboard command toward the bot fleet.
///
/// # Errors
/// Returns 404 for an unknown bot, 400 for a missing pair or malformed
/// payload. A rejected command is never broadcast, so the HTTP error is the
/// caller's only failure signal.
pub async fn send_command(
    State(relay): State<Arc<RelayService>>,
    Path(bot_id): Path<String>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandReceipt>, ApiError> {
    let receipt = relay.dispatch(&bot_id, request).await?;
    Ok(Json(receipt))
}

/// Returns up to the 50 most recent signals, newest first.
///
/// # Errors
/// Returns 500 if the registry is unavailable.
pub async fn recent_signals(
    State(relay): State<Arc<RelayService>>,
) -> Result<Json<Vec<Signal>>, ApiError> {
    Ok(Json(
        relay.registry().recent_signals(RECENT_SIGNALS_LIMIT).await?,
    ))
}

#[derive(Serialize)]
pub struct SaveSignalResponse {
    pub success: bool,
}

/// Persists a signal, upserting by id so redelivery stays duplicate-free.
///
/// # Errors
/// Returns 500 if the registry is unavailable.
pub async fn save_signal(
    State(relay): State<Arc<RelayService>>,
    Json(signal): Json<Signal>,
) -> Result<Json<SaveSignalResponse>, ApiError> {
    relay.registry().upsert_signal(&signal).await?;
    Ok(Json(SaveSignalResponse { success: true }))
}

/// # Errors
/// Returns 500 if the registry is unavailable.
pub async fn market_data(
    State(relay): State<Arc<RelayService>>,
) -> Result<Json<Vec<MarketAsset>>, ApiError> {
    Ok(Json(relay.registry().market_assets().await?))
}

#[derive(Deserialize)]
pub struct CandlesQuery {
    pub pair: Option<String>,
    pub timeframe: Option<String>,
}

/// Returns the candle bucket for a pair/timeframe, `[]` when absent.
///
/// # Errors
/// Returns 400 when either query parameter is missing.
pub async fn candles(
    State(relay): State<Arc<RelayService>>,
    Query(query): Query<CandlesQuery>,
) -> Result<Json<Vec<Candle>>, ApiError> {
    let (Some(pair), Some(timeframe)) = (query.pair, query.timeframe) else {
        return Err(ApiError::bad_request("Missing pair or timeframe"));
    };
    Ok(Json(relay.registry().candles(&pair, &timeframe).await?))
}
