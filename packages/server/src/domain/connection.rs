//! 接続ハンドル定義
//!
//! 1 本の生きた接続のライトハーフを包み、ハンドルごとの排他ロックで
//! 書き込みを直列化します。複数の論理送信元（ブロードキャストエンジン、
//! ハンドシェイク応答）からの同時 `send` が 1 つの接続上で部分書き込みを
//! 交錯させることはありません。
//!
//! トランスポート自体の生成（WebSocket のアップグレード等）は UI 層で
//! 行われ、このハンドルは `Transport` trait を通じて書き込みと切断のみを
//! 担当します（リードハーフは接続ごとの読み取りループが所有する）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::error::{SendError, TransportError};
use super::event::Event;
use super::value_object::ConnectionId;

/// 1 受信者への書き込みタイムアウトの既定値
///
/// 応答しない受信者がブロードキャスト全体を停滞させないための上限。
/// タイムアウトは送信失敗として扱われ、その受信者は退去される。
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// トランスポート（メッセージフレーム化された双方向チャネルの送信側）
///
/// 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
#[async_trait]
pub trait Transport: Send {
    /// イベントをシリアライズして 1 フレームとして書き込む
    async fn send_event(&mut self, event: &Event) -> Result<(), TransportError>;

    /// トランスポートを閉じる
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// 接続ハンドル
///
/// ハンドシェイクから切断までの 1 セッションに対応する。接続 ID は
/// 再接続では再利用されない（新しいハンドシェイク = 新しいハンドル）。
pub struct ConnectionHandle {
    id: ConnectionId,
    writer: Mutex<Box<dyn Transport>>,
    closed: AtomicBool,
    send_timeout: Duration,
}

impl ConnectionHandle {
    /// 新しい接続ハンドルを作成
    pub fn new(transport: Box<dyn Transport>, send_timeout: Duration) -> Self {
        Self {
            id: ConnectionId::generate(),
            writer: Mutex::new(transport),
            closed: AtomicBool::new(false),
            send_timeout,
        }
    }

    /// 接続 ID を取得
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// イベントをこの接続に書き込む
    ///
    /// ハンドルごとの排他ロックを取得して 1 フレームを書き込む。
    /// ロック待ちを含めて `send_timeout` で打ち切られ、タイムアウトは
    /// 送信失敗として返る。
    pub async fn send(&self, event: &Event) -> Result<(), SendError> {
        let write = async {
            let mut writer = self.writer.lock().await;
            if self.closed.load(Ordering::SeqCst) {
                return Err(SendError::Closed);
            }
            writer.send_event(event).await.map_err(SendError::from)
        };

        match tokio::time::timeout(self.send_timeout, write).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout(self.send_timeout)),
        }
    }

    /// 接続を閉じる（冪等）
    ///
    /// 2 回目以降・並行した呼び出しは何もしない。
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.close().await {
            tracing::debug!("closing transport for connection {} failed: {}", self.id, e);
        }
    }

    /// 閉じられているかどうか
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
