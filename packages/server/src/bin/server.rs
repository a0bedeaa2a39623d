//! Room-scoped WebSocket chat server with history replay.
//!
//! Clients join a room over WebSocket, receive the room's full message
//! history, and exchange messages with the other members of the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHistoryStore, InMemoryRoomRepository},
    },
    ui::Server,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        SubmitMessageUseCase,
    },
};
use idobata_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "Room-scoped WebSocket chat server with history replay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository / HistoryStore
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Server

    // 1. Create Repository and HistoryStore (in-memory)
    let repository = Arc::new(InMemoryRoomRepository::new());
    let history = Arc::new(InMemoryHistoryStore::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Clock
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        repository.clone(),
        history.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let submit_message_usecase = Arc::new(SubmitMessageUseCase::new(
        repository.clone(),
        history.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase =
        Arc::new(GetRoomDetailUseCase::new(repository.clone(), history.clone()));

    // 5. Create and run the server
    let server = Server::new(
        join_room_usecase,
        submit_message_usecase,
        leave_room_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
