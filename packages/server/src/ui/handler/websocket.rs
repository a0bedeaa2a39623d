//! WebSocket connection handlers.
//!
//! A joining connection goes through a strictly ordered sequence:
//! registered in the room's member set (inside `JoinRoomUseCase::execute`,
//! before the upgrade completes) → join notice broadcast to the other
//! members → full history replayed to the new connection → live send/receive
//! loops. The join notice is sent before the replay so peers learn about the
//! new member before any backlog traffic, and the new member's own arrival is
//! never part of its own replay.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{DisplayName, PushOutcome, RoomName},
    infrastructure::dto::websocket::{WireMessage, parse_submission},
    ui::state::AppState,
    usecase::Membership,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Display name of the joining connection (blank or missing → "Anonymous")
    pub name: Option<String>,
}

/// Join the default room (`GET /ws`)
pub async fn websocket_handler_default(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    join_room(ws, state, RoomName::default(), query).await
}

/// Join a named room (`GET /rooms/{room}/ws`)
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    join_room(ws, state, RoomName::parse(room), query).await
}

async fn join_room(
    ws: WebSocketUpgrade,
    state: Arc<AppState>,
    room: RoomName,
    query: ConnectQuery,
) -> Result<impl IntoResponse, StatusCode> {
    let display_name = DisplayName::parse(query.name.as_deref().unwrap_or_default());

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Use JoinRoomUseCase to establish the membership
    // (channel registration happens inside the UseCase)
    match state
        .join_room_usecase
        .execute(room, display_name, tx)
        .await
    {
        Ok(membership) => {
            tracing::info!(
                "Connection '{}' joined room '{}' as '{}'",
                membership.connection_id,
                membership.room,
                membership.display_name
            );
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, membership, rx)))
        }
        Err(e) => {
            // No membership is established; the caller sees the rejection
            tracing::warn!("Failed to join room: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: messages from other members
/// (via rx channel) are sent to this connection's WebSocket.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages from other members
/// * `sender` - WebSocket sink to send messages to this connection
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

fn count_failed(outcomes: &[PushOutcome]) -> usize {
    outcomes.iter().filter(|o| !o.is_ok()).count()
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    membership: Membership,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Announce the join to all other members, before any replay traffic
    {
        let notice = WireMessage::joined_notice(membership.display_name.as_str());
        let notice_json = serde_json::to_string(&notice).unwrap();
        let outcomes = state
            .join_room_usecase
            .broadcast_joined(&membership, &notice_json)
            .await;
        let failed = count_failed(&outcomes);
        if failed > 0 {
            tracing::warn!(
                "Join notice for '{}' not delivered to {} member(s)",
                membership.display_name,
                failed
            );
        }
        tracing::info!("Broadcasted join notice for '{}'", membership.display_name);
    }

    // Replay the full room history to the new connection, oldest first.
    // Live broadcasts queue up in rx meanwhile and are delivered after the
    // replay by the pusher loop below.
    let mut replay_failed = false;
    {
        let history = state
            .join_room_usecase
            .replay_history(&membership.room)
            .await;
        let count = history.len();
        for message in history {
            let wire: WireMessage = message.into();
            let json = serde_json::to_string(&wire).unwrap();
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::error!(
                    "Failed to replay history to '{}': {}",
                    membership.connection_id,
                    e
                );
                replay_failed = true;
                break;
            }
        }
        if !replay_failed {
            tracing::info!(
                "Replayed {} message(s) to '{}'",
                count,
                membership.connection_id
            );
        }
    }

    if !replay_failed {
        let room = membership.room.clone();
        let connection_id = membership.connection_id.clone();
        let state_clone = state.clone();

        // Spawn a task to receive messages from this connection
        let mut recv_task = tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        tracing::debug!("Received text: {}", text);

                        // Malformed submissions are dropped silently: no error
                        // to the sender, no log append, no broadcast
                        let Some(body) = parse_submission(&text) else {
                            tracing::debug!(
                                "Ignoring malformed submission from '{}'",
                                connection_id
                            );
                            continue;
                        };

                        // Use SubmitMessageUseCase to append the message, then
                        // broadcast the stored (timestamp-adjusted) message
                        match state_clone
                            .submit_message_usecase
                            .execute(&room, &connection_id, body)
                            .await
                        {
                            Ok((stored, targets)) => {
                                let wire: WireMessage = stored.into();
                                let json = serde_json::to_string(&wire).unwrap();
                                tracing::info!(
                                    "Broadcasting message from '{}' to {} member(s)",
                                    wire.name,
                                    targets.len()
                                );
                                let outcomes = state_clone
                                    .submit_message_usecase
                                    .broadcast_message(targets, &json)
                                    .await;
                                let failed = count_failed(&outcomes);
                                if failed > 0 {
                                    tracing::warn!(
                                        "Message from '{}' not delivered to {} member(s)",
                                        wire.name,
                                        failed
                                    );
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Failed to submit message: {}", e);
                            }
                        }
                    }
                    Message::Ping(_) => {
                        tracing::debug!("Received ping");
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    Message::Close(_) => {
                        tracing::info!("Connection '{}' requested close", connection_id);
                        break;
                    }
                    _ => {}
                }
            }
        });

        // Spawn a task to receive messages from other members and send to this connection
        let mut send_task = pusher_loop(rx, sender);

        // If any one of the tasks completes, abort the other
        tokio::select! {
            _ = &mut recv_task => send_task.abort(),
            _ = &mut send_task => recv_task.abort(),
        };
    }

    // Use LeaveRoomUseCase to handle the disconnection. Removal always
    // happens; the leave notice is skipped when the membership metadata
    // cannot be recovered.
    match state
        .leave_room_usecase
        .execute(&membership.room, &membership.connection_id)
        .await
    {
        Some((member, targets)) => {
            tracing::info!(
                "Connection '{}' left room '{}'",
                membership.connection_id,
                membership.room
            );

            let notice = WireMessage::left_notice(member.name.as_str());
            let notice_json = serde_json::to_string(&notice).unwrap();
            let outcomes = state
                .leave_room_usecase
                .broadcast_left(targets, &notice_json)
                .await;
            let failed = count_failed(&outcomes);
            if failed > 0 {
                tracing::warn!(
                    "Leave notice for '{}' not delivered to {} member(s)",
                    member.name,
                    failed
                );
            }
        }
        None => {
            tracing::warn!(
                "Connection '{}' left room '{}' without recoverable membership; skipping leave notice",
                membership.connection_id,
                membership.room
            );
        }
    }
}
