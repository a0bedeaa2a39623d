//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, SubmitMessageUseCase,
};

use super::{
    handler::{
        debug_room_state, get_room_detail, get_rooms, health_check, websocket_handler,
        websocket_handler_default,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Room-scoped WebSocket chat server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     submit_message_usecase,
///     leave_room_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（Room 参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// SubmitMessageUseCase（メッセージ送信のユースケース）
    submit_message_usecase: Arc<SubmitMessageUseCase>,
    /// LeaveRoomUseCase（Room 退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `join_room_usecase` - UseCase for joining a room
    /// * `submit_message_usecase` - UseCase for submitting a message
    /// * `leave_room_usecase` - UseCase for leaving a room
    /// * `get_rooms_usecase` - UseCase for getting the rooms list
    /// * `get_room_detail_usecase` - UseCase for getting room detail
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        submit_message_usecase: Arc<SubmitMessageUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            join_room_usecase,
            submit_message_usecase,
            leave_room_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            submit_message_usecase: self.submit_message_usecase,
            leave_room_usecase: self.leave_room_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler_default))
            .route("/rooms/{room}/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .route("/debug/rooms/{room}", get(debug_room_state))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Room-scoped chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws or ws://{}/rooms/{{room}}/ws", bind_addr, bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
