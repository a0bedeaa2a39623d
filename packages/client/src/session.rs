//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use idobata_server::infrastructure::dto::websocket::{SubmitPayload, WireMessage};
use idobata_shared::time::get_unix_timestamp;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run the WebSocket client session
pub async fn run_client_session(
    url: &str,
    room: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Construct the room endpoint URL with the display name as query parameter
    let url = format!(
        "{}/rooms/{}/ws?name={}",
        url.trim_end_matches('/'),
        room,
        name
    );

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            // A non-101 HTTP response means the server refused the join;
            // no membership was established and retrying won't help
            if let tungstenite::Error::Http(response) = &e {
                return Err(Box::new(ClientError::Rejected(format!(
                    "HTTP {}",
                    response.status()
                ))));
            }
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}' in room '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name, room
    );

    let (mut write, mut read) = ws_stream.split();

    // Clone name for read task
    let name_for_read = name.to_string();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    // Replay, live messages and notices all share one wire
                    // shape; notices are the ones without a timestamp
                    if let Ok(wire) = serde_json::from_str::<WireMessage>(&text) {
                        let formatted = match wire.timestamp {
                            Some(sent_at) => MessageFormatter::format_chat_message(
                                &wire.name,
                                &wire.message,
                                sent_at,
                            ),
                            None => MessageFormatter::format_notice(&wire.name, &wire.message),
                        };
                        print!("{}", formatted);
                    }
                    // If parsing fails, display as raw text
                    else {
                        let formatted = MessageFormatter::format_raw_message(&text);
                        print!("{}", formatted);
                    }
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone name for the input loop
    let name = name.to_string();
    let name_for_prompt = name.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to handle stdin input and send to WebSocket
    let name_for_write = name.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            // The server assigns sender name and timestamp; the client only
            // submits the message body
            let payload = SubmitPayload { message: line };

            let json = match serde_json::to_string(&payload) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }

            // Display sent timestamp (local clock) and redisplay prompt
            let formatted = MessageFormatter::format_sent_confirmation(get_unix_timestamp());
            print!("\n{}", formatted);
            redisplay_prompt(&name_for_write);
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
