use crate::{handlers, websocket};
use axum::{
    routing::{get, post},
    Router,
};
use nexus_relay::RelayService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    relay: Arc<RelayService>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(relay: Arc<RelayService>) -> Self {
        Self { relay }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/bots", get(handlers::list_bots))
            .route("/api/bots/sync", post(handlers::sync_bots))
            .route("/api/bots/:bot_id", post(handlers::update_bot))
            .route("/api/bots/:bot_id/command", post(handlers::send_command))
            .route(
                "/api/signals",
                get(handlers::recent_signals).post(handlers::save_signal),
            )
            .route("/api/market-data", get(handlers::market_data))
            .route("/api/candles", get(handlers::candles))
            .route("/ws", get(websocket::websocket_handler))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.relay.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve
    /// requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Relay API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
