//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use fanout_server::infrastructure::dto::websocket::MessageDto;
use fanout_shared::time::get_timestamp;

use crate::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket client session
///
/// Lines received on `input_rx` are sent as messages from `name`; everything the
/// relay sends is printed.
///
/// # Returns
///
/// * `Ok(())` - the input channel closed (the user quit)
/// * `Err(ClientError::Rejected)` - the server refused the upgrade
/// * `Err(ClientError::ConnectionError)` - connecting failed or the connection was lost
pub async fn run_client_session(
    url: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(WsError::Http(response)) => {
            return Err(ClientError::Rejected(response.status().as_u16()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to relay server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let name_for_read = name.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match MessageDto::decode(text.as_bytes()) {
                        Ok(dto) => MessageFormatter::format_message(
                            &dto.sender,
                            &dto.text,
                            get_timestamp(),
                        ),
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Forward terminal input to the relay until the input channel closes
    let write_loop = async {
        while let Some(line) = input_rx.recv().await {
            let msg = MessageDto {
                sender: name.to_string(),
                text: line,
            };

            let json = match msg.encode() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::text(json)).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        }

        if let Err(e) = write.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame: {}", e);
        }
        Ok(())
    };

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        write_result = write_loop => {
            read_task.abort();
            write_result
        }
    }
}
