//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use idobata_server::infrastructure::dto::websocket::WireEvent;
use idobata_shared::time::get_jst_timestamp;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run the WebSocket client session
///
/// Connects to the server, sends the auth event as the first frame, waits
/// for the handshake to resolve, then runs the read/write loops until the
/// connection ends or the user exits.
pub async fn run_client_session(
    url: &str,
    token: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    // The first frame sent must be the auth event carrying the session token
    let auth = WireEvent::Auth {
        token: token.to_string(),
    };
    let auth_json = serde_json::to_string(&auth)?;
    if let Err(e) = ws_stream.send(Message::Text(auth_json.into())).await {
        return Err(Box::new(ClientError::ConnectionError(e.to_string())));
    }

    // Handshake: wait for auth_success or auth_failed
    let username = loop {
        let text = match ws_stream.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection closed during handshake".to_string(),
                )));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                return Err(Box::new(ClientError::ConnectionError(e.to_string())));
            }
        };

        match serde_json::from_str::<WireEvent>(&text) {
            // The server prompts for the token right after the upgrade;
            // we already sent it, so this is informational only
            Ok(WireEvent::AuthRequest) => continue,
            Ok(WireEvent::AuthSuccess { username }) => break username,
            Ok(WireEvent::AuthFailed) => {
                return Err(Box::new(ClientError::AuthenticationFailed));
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Failed to parse handshake frame: {}", e);
                continue;
            }
        }
    };

    tracing::info!("Connected to chat server!");
    print!("{}", MessageFormatter::format_auth_success(&username));
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    // Clone username for read task
    let username_for_read = username.clone();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<WireEvent>(&text) {
                        Ok(WireEvent::Message {
                            username,
                            content,
                            is_self,
                        }) => MessageFormatter::format_chat_message(
                            username.as_deref().unwrap_or("unknown"),
                            &content,
                            is_self,
                        ),
                        Ok(WireEvent::UserJoin { username, is_self }) => {
                            MessageFormatter::format_user_join(&username, is_self)
                        }
                        Ok(WireEvent::UserLeave { username, .. }) => {
                            MessageFormatter::format_user_leave(&username)
                        }
                        // Other kinds are handshake-only; display raw if parsing fails
                        Ok(_) => continue,
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&username_for_read);
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

    // Clone username for the input loop
    let username_for_prompt = username.clone();

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

        let prompt = format!("{}> ", username_for_prompt);

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
    let username_for_write = username.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            // The server attaches our username and is_self on broadcast
            let msg = WireEvent::Message {
                username: None,
                content: line,
                is_self: false,
            };

            let json = match serde_json::to_string(&msg) {
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

            // Display sent timestamp and redisplay prompt
            let formatted = MessageFormatter::format_sent_confirmation(get_jst_timestamp());
            print!("\n{}", formatted);
            redisplay_prompt(&username_for_write);
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
