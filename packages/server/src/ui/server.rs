//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetStatusUseCase, RelayMessageUseCase,
};

use super::{
    config::ServerConfig,
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Path of the WebSocket upgrade endpoint
pub const WEBSOCKET_PATH: &str = "/ws/messages";

/// Error type returned by [`Server::run`] and [`Server::serve`]
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     ServerConfig::default(),
///     connect_client_usecase,
///     disconnect_client_usecase,
///     relay_message_usecase,
///     get_status_usecase,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    relay_message_usecase: Arc<RelayMessageUseCase>,
    /// GetStatusUseCase（状態取得のユースケース）
    get_status_usecase: Arc<GetStatusUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        config: ServerConfig,
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        get_status_usecase: Arc<GetStatusUseCase>,
    ) -> Self {
        Self {
            config,
            connect_client_usecase,
            disconnect_client_usecase,
            relay_message_usecase,
            get_status_usecase,
        }
    }

    /// Build the application router.
    ///
    /// `WEBSOCKET_PATH` upgrades to the relay, `/api/health` reports liveness, and
    /// every other request is served from the public directory.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase.clone(),
            disconnect_client_usecase: self.disconnect_client_usecase.clone(),
            relay_message_usecase: self.relay_message_usecase.clone(),
            get_status_usecase: self.get_status_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route(WEBSOCKET_PATH, get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            // 静的ファイル
            .fallback_service(ServeDir::new(&self.config.public_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to the configured address and run until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        let local_addr = listener.local_addr()?;

        tracing::info!("WebSocket relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}{}", local_addr, WEBSOCKET_PATH);
        tracing::info!(
            "Serving static files from {}",
            self.config.public_dir.display()
        );
        match self.config.max_connections {
            Some(max) => tracing::info!("Accepting at most {} connections", max),
            None => tracing::info!("Accepting an unbounded number of connections"),
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
