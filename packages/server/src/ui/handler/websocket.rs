//! WebSocket connection handlers.
//!
//! One `handle_socket` runs per accepted client:
//!
//! 1. `Connecting`: register the outbound channel with the registry.
//! 2. `Active`: write the greeting, then run a reader (inbound frames → broadcast)
//!    and a writer (outbound channel → socket) until either ends.
//! 3. `Closed`: unregister. When the client stopped sending, the writer is then
//!    left to flush its queue and send a close frame.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{
            CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle, time::timeout};

use crate::{
    domain::{ConnectionId, ConnectionState, Message},
    infrastructure::dto::websocket::MessageDto,
    ui::state::AppState,
};

/// How long the writer may take to flush its queue once the reader has ended
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("WebSocket upgrade rejected: {}", rejection);
            return rejection.into_response();
        }
    };

    if !state.connect_client_usecase.has_capacity().await {
        tracing::warn!("Connection limit reached. Rejecting upgrade.");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    ws.on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    run_connection(sender, receiver, state, ConnectionId::generate()).await;
}

/// Drives one connection over an already split socket.
async fn run_connection<S, R>(
    mut sender: S,
    receiver: R,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) where
    S: Sink<WsMessage, Error = axum::Error> + Unpin + Send + 'static,
    R: Stream<Item = Result<WsMessage, axum::Error>> + Unpin + Send + 'static,
{
    let mut connection_state = ConnectionState::Connecting;

    // Channel through which broadcasts reach this client
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_client_usecase
        .execute(connection_id, tx)
        .await
    {
        tracing::warn!("Cannot register connection '{}': {}", connection_id, e);
        let frame = CloseFrame {
            code: close_code::AGAIN,
            reason: e.to_string().into(),
        };
        if let Err(e) = sender.send(WsMessage::Close(Some(frame))).await {
            tracing::debug!("Failed to send close frame to '{}': {}", connection_id, e);
        }
        return;
    }

    connection_state.activate();
    tracing::debug!("Connection '{}' is {}", connection_id, connection_state);

    // The writer is not running yet, so anything broadcast meanwhile stays queued
    // behind the greeting.
    if let Err(e) = send_greeting(&mut sender).await {
        tracing::error!("Failed to send greeting to '{}': {}", connection_id, e);
        connection_state.close();
        state.disconnect_client_usecase.execute(connection_id).await;
        return;
    }
    tracing::info!("Sent greeting to '{}'", connection_id);

    let mut recv_task = reader_loop(receiver, state.clone(), connection_id);
    let mut send_task = pusher_loop(rx, sender, connection_id);

    let reader_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };

    // Unregistering drops the outbound sender, which lets the writer run dry
    connection_state.close();
    tracing::debug!("Connection '{}' is {}", connection_id, connection_state);
    state.disconnect_client_usecase.execute(connection_id).await;

    if reader_finished {
        if timeout(CLOSE_TIMEOUT, &mut send_task).await.is_err() {
            tracing::warn!("Connection '{}' did not close in time", connection_id);
            send_task.abort();
        }
    } else {
        recv_task.abort();
    }
}

/// Write the one-time greeting directly on the socket
async fn send_greeting<S>(sender: &mut S) -> Result<(), axum::Error>
where
    S: Sink<WsMessage, Error = axum::Error> + Unpin,
{
    let greeting = MessageDto::from(Message::greeting())
        .encode()
        .map_err(axum::Error::new)?;
    sender.send(WsMessage::Text(greeting.into())).await
}

/// Spawns a task that reads frames from this client and broadcasts each decoded message.
///
/// The loop ends on close, on a transport error, or on the first payload that does
/// not decode as a message; there is no attempt to resynchronize.
fn reader_loop<R>(
    mut receiver: R,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> JoinHandle<()>
where
    R: Stream<Item = Result<WsMessage, axum::Error>> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Failed to read from connection '{}': {}", connection_id, e);
                    break;
                }
            };

            let payload: &[u8] = match &frame {
                WsMessage::Text(text) => text.as_str().as_bytes(),
                WsMessage::Binary(data) => &data[..],
                WsMessage::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                WsMessage::Ping(_) | WsMessage::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
            };

            let dto = match MessageDto::decode(payload) {
                Ok(dto) => dto,
                Err(e) => {
                    tracing::warn!(
                        "Malformed message from connection '{}': {}",
                        connection_id,
                        e
                    );
                    break;
                }
            };

            let json_message = match dto.encode() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    break;
                }
            };
            let message = Message::from(dto);

            state
                .relay_message_usecase
                .execute(connection_id, &message, &json_message)
                .await;
        }
    })
}

/// Spawns a task that forwards queued frames to this client's socket.
///
/// Ends with a close frame once the channel closes (the connection was
/// unregistered), or immediately when a write fails.
fn pusher_loop<S>(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: S,
    connection_id: ConnectionId,
) -> JoinHandle<()>
where
    S: Sink<WsMessage, Error = axum::Error> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(WsMessage::Text(msg.into())).await {
                tracing::warn!("Failed to write to connection '{}': {}", connection_id, e);
                return;
            }
        }

        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        };
        if let Err(e) = sender.send(WsMessage::Close(Some(frame))).await {
            tracing::debug!("Failed to send close frame to '{}': {}", connection_id, e);
        }
    })
}

#[cfg(test)]
mod tests {
    use std::{
        pin::Pin,
        sync::Mutex,
        task::{Context, Poll},
    };

    use futures_util::stream::{self, BoxStream};

    use super::*;
    use crate::{
        domain::ConnectionRegistry,
        infrastructure::registry::InMemoryConnectionRegistry,
        usecase::{
            ConnectClientUseCase, DisconnectClientUseCase, GetStatusUseCase, RelayMessageUseCase,
        },
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 挨拶の送信に失敗した接続は登録解除される
    // - 書き込みに失敗した接続は登録解除され、他の受信者には配信が続く
    // - チャンネルが閉じると close フレームを送って終わる
    // - 不正なペイロードの後は close フレームで終わる
    // ========================================

    /// Socket stand-in that records written frames and fails once `accept` frames
    /// have been written.
    struct RecordingSink {
        frames: Arc<Mutex<Vec<WsMessage>>>,
        accept: usize,
    }

    impl RecordingSink {
        fn new(accept: usize) -> (Self, Arc<Mutex<Vec<WsMessage>>>) {
            let frames = Arc::new(Mutex::new(Vec::new()));
            let sink = Self {
                frames: frames.clone(),
                accept,
            };
            (sink, frames)
        }
    }

    impl Sink<WsMessage> for RecordingSink {
        type Error = axum::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            if self.frames.lock().unwrap().len() >= self.accept {
                Poll::Ready(Err(axum::Error::new("connection reset by peer")))
            } else {
                Poll::Ready(Ok(()))
            }
        }

        fn start_send(self: Pin<&mut Self>, item: WsMessage) -> Result<(), Self::Error> {
            self.frames.lock().unwrap().push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Inbound frames followed by a client that stays connected but silent
    fn inbound(frames: Vec<WsMessage>) -> BoxStream<'static, Result<WsMessage, axum::Error>> {
        stream::iter(frames.into_iter().map(Ok::<_, axum::Error>))
            .chain(stream::pending())
            .boxed()
    }

    fn create_state(registry: Arc<InMemoryConnectionRegistry>) -> Arc<AppState> {
        Arc::new(AppState {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(registry.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(registry.clone())),
            relay_message_usecase: Arc::new(RelayMessageUseCase::new(registry.clone())),
            get_status_usecase: Arc::new(GetStatusUseCase::new(registry)),
        })
    }

    fn greeting_frame() -> WsMessage {
        let greeting = MessageDto::from(Message::greeting()).encode().unwrap();
        WsMessage::Text(greeting.into())
    }

    fn normal_close_frame() -> WsMessage {
        WsMessage::Close(Some(CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        }))
    }

    #[tokio::test]
    async fn test_send_greeting_writes_greeting_frame() {
        // テスト項目: 挨拶がテキストフレームとして書き込まれる
        // given (前提条件):
        let (mut sink, frames) = RecordingSink::new(usize::MAX);

        // when (操作):
        let result = send_greeting(&mut sink).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(*frames.lock().unwrap(), vec![greeting_frame()]);
    }

    #[tokio::test]
    async fn test_send_greeting_reports_write_failure() {
        // テスト項目: 書き込みに失敗するとエラーを返す
        // given (前提条件):
        let (mut sink, frames) = RecordingSink::new(0);

        // when (操作):
        let result = send_greeting(&mut sink).await;

        // then (期待する結果):
        assert!(result.is_err());
        assert!(frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pusher_loop_sends_close_frame_after_channel_closes() {
        // テスト項目: キューを書き切った後に close フレームを送る
        // given (前提条件):
        let (sink, frames) = RecordingSink::new(usize::MAX);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("queued".to_string()).unwrap();
        drop(tx);

        // when (操作):
        pusher_loop(rx, sink, ConnectionId::generate()).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            *frames.lock().unwrap(),
            vec![WsMessage::Text("queued".into()), normal_close_frame()]
        );
    }

    #[tokio::test]
    async fn test_pusher_loop_stops_on_write_failure() {
        // テスト項目: 書き込みに失敗したらループを抜け、チャンネルを閉じる
        // given (前提条件):
        let (sink, frames) = RecordingSink::new(0);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("lost".to_string()).unwrap();

        // when (操作):
        pusher_loop(rx, sink, ConnectionId::generate()).await.unwrap();

        // then (期待する結果):
        assert!(tx.is_closed());
        assert!(frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_greeting_failure_unregisters_connection() {
        // テスト項目: 挨拶を書けなかった接続は登録解除され、他の接続は残る
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = create_state(registry.clone());
        let peer_id = ConnectionId::generate();
        let (peer_tx, _peer_rx) = mpsc::unbounded_channel();
        registry.register(peer_id, peer_tx).await.unwrap();
        let connection_id = ConnectionId::generate();
        let (sink, _frames) = RecordingSink::new(0);

        // when (操作):
        run_connection(sink, inbound(vec![]), state, connection_id).await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 1);
        assert!(!registry.unregister(&connection_id).await);
        assert!(registry.unregister(&peer_id).await);
    }

    #[tokio::test]
    async fn test_write_failure_unregisters_connection_and_peer_still_receives() {
        // テスト項目: 書き込みに失敗した接続だけが外れ、他の受信者には配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = create_state(registry.clone());
        let (peer_tx, mut peer_rx) = mpsc::unbounded_channel();
        registry
            .register(ConnectionId::generate(), peer_tx)
            .await
            .unwrap();
        let connection_id = ConnectionId::generate();
        // Accepts the greeting, then fails on the first relayed frame
        let (sink, frames) = RecordingSink::new(1);
        let payload = r#"{"sender":"Alice","text":"hi"}"#;

        // when (操作):
        run_connection(
            sink,
            inbound(vec![WsMessage::Text(payload.into())]),
            state,
            connection_id,
        )
        .await;

        // then (期待する結果):
        assert_eq!(peer_rx.recv().await, Some(payload.to_string()));
        assert_eq!(registry.count().await, 1);
        assert!(!registry.unregister(&connection_id).await);
        assert_eq!(*frames.lock().unwrap(), vec![greeting_frame()]);
    }

    #[tokio::test]
    async fn test_malformed_payload_ends_with_close_frame() {
        // テスト項目: 不正なペイロードを受けると登録解除され close フレームが送られる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let state = create_state(registry.clone());
        let connection_id = ConnectionId::generate();
        let (sink, frames) = RecordingSink::new(usize::MAX);

        // when (操作):
        run_connection(
            sink,
            inbound(vec![WsMessage::Text("not json".into())]),
            state,
            connection_id,
        )
        .await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 0);
        assert_eq!(
            *frames.lock().unwrap(),
            vec![greeting_frame(), normal_close_frame()]
        );
    }

    #[tokio::test]
    async fn test_registration_over_capacity_sends_again_close_frame() {
        // テスト項目: 上限を超えた登録は AGAIN の close フレームで断られる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::with_max_connections(Some(0)));
        let state = create_state(registry.clone());
        let (sink, frames) = RecordingSink::new(usize::MAX);

        // when (操作):
        run_connection(sink, inbound(vec![]), state, ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(registry.count().await, 0);
        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert!(matches!(
            &frames[0],
            WsMessage::Close(Some(frame)) if frame.code == close_code::AGAIN
        ));
    }
}
