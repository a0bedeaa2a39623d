//! Room-scoped WebSocket chat client with reconnection support.
//!
//! Connects to a chat server, joins a room, receives the room's message
//! history and exchanges live messages with the other members. Messages are
//! read from stdin. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval); a refused join exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --name Alice
//! cargo run --bin idobata-client -- -r lobby -n Bob
//! ```

use clap::Parser;

use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-client")]
#[command(about = "WebSocket chat client for room-scoped chat with history replay", long_about = None)]
struct Args {
    /// Server base URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Room to join
    #[arg(short = 'r', long, default_value = "default")]
    room: String,

    /// Display name shown to the other members
    #[arg(short = 'n', long, default_value = "Anonymous")]
    name: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = idobata_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
