//! WebSocket を使った Transport 実装
//!
//! ## 責務
//!
//! - WebSocket のシンク（ライトハーフ）を所有する
//! - ドメインイベントをワイヤ表現（JSON テキストフレーム）にエンコードして書き込む
//!
//! ## 設計ノート
//!
//! WebSocket のアップグレードと split は UI 層（`ui/handler/websocket.rs`）で
//! 行われます。この実装は split 済みのシンクを受け取り、書き込みと
//! クローズのみを担当します。書き込みの直列化はこの型の責務ではなく、
//! `ConnectionHandle` のハンドルごとのロックが保証します。

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{sink::SinkExt, stream::SplitSink};

use crate::domain::{Event, Transport, TransportError};
use crate::infrastructure::dto::websocket::encode_event;

/// WebSocket を使った Transport 実装
pub struct WebSocketTransport {
    sink: SplitSink<WebSocket, Message>,
}

impl WebSocketTransport {
    /// split 済みの WebSocket シンクからトランスポートを作成
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send_event(&mut self, event: &Event) -> Result<(), TransportError> {
        let json = encode_event(event).map_err(|e| TransportError::Encode(e.to_string()))?;
        self.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // Close フレームの送信はベストエフォート（相手が先に切れていてもよい）
        let _ = self.sink.send(Message::Close(None)).await;
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::Close(e.to_string()))
    }
}
