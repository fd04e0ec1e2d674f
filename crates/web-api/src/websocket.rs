use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use nexus_core::InboundEvent;
use nexus_relay::RelayService;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<RelayService>>,
) -> Response {
    ws.on_upgrade(|socket| websocket_connection(socket, relay))
}

/// One connection per participant, dashboard tab or bot process alike.
///
/// Outbound frames from the bus are forwarded as JSON text; inbound text is
/// parsed as a bot event and fed to the relay. Malformed inbound frames are
/// logged and dropped — there is no request to answer for push-originated
/// events. A connection that lags more than the bus capacity skips ahead.
async fn websocket_connection(mut socket: WebSocket, relay: Arc<RelayService>) {
    let mut frames = relay.subscribe();

    loop {
        tokio::select! {
            frame = frames.recv() => {
                match frame {
                    Ok(frame) => match serde_json::to_string(&frame) {
                        Ok(json) => {
                            if socket.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => tracing::error!("Unserializable frame: {err}"),
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Subscriber lagged, {skipped} frames skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<InboundEvent>(&text) {
                            Ok(event) => {
                                if let Err(err) = relay.ingest(event).await {
                                    tracing::warn!("Inbound event dropped: {err}");
                                }
                            }
                            Err(err) => tracing::debug!("Malformed frame dropped: {err}"),
                        }
                    }
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!("WebSocket connection closed");
}
