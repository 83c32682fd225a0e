//! テスト用の Transport 実装
//!
//! 送信されたイベントを記録し、書き込み失敗や停滞を注入できるモック。
//! connection / registry / broadcast / usecase のテストで共有する。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;

use super::connection::{ConnectionHandle, DEFAULT_SEND_TIMEOUT, Transport};
use super::error::TransportError;
use super::event::Event;

/// モックトランスポートの観測・操作用ハンドル
#[derive(Clone)]
pub(crate) struct TransportProbe {
    sent: Arc<StdMutex<Vec<Event>>>,
    close_count: Arc<AtomicUsize>,
    fail_sends: Arc<AtomicBool>,
}

impl TransportProbe {
    /// これまでに送信されたイベントのコピーを取得
    pub fn sent_events(&self) -> Vec<Event> {
        self.sent.lock().unwrap().clone()
    }

    /// close が呼ばれた回数
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    /// 以降の send をすべて失敗させる
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }
}

/// 送信されたイベントを記録する Transport 実装
pub(crate) struct RecordingTransport {
    sent: Arc<StdMutex<Vec<Event>>>,
    close_count: Arc<AtomicUsize>,
    fail_sends: Arc<AtomicBool>,
    send_delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> (Self, TransportProbe) {
        Self::build(None)
    }

    /// send のたびに指定時間停滞するトランスポート（タイムアウト試験用）
    pub fn with_send_delay(delay: Duration) -> (Self, TransportProbe) {
        Self::build(Some(delay))
    }

    fn build(send_delay: Option<Duration>) -> (Self, TransportProbe) {
        let sent = Arc::new(StdMutex::new(Vec::new()));
        let close_count = Arc::new(AtomicUsize::new(0));
        let fail_sends = Arc::new(AtomicBool::new(false));
        let probe = TransportProbe {
            sent: sent.clone(),
            close_count: close_count.clone(),
            fail_sends: fail_sends.clone(),
        };
        let transport = Self {
            sent,
            close_count,
            fail_sends,
            send_delay,
        };
        (transport, probe)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_event(&mut self, event: &Event) -> Result<(), TransportError> {
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Write("simulated write failure".to_string()));
        }
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 既定のタイムアウトで接続ハンドルとプローブを作成
pub(crate) fn test_handle() -> (ConnectionHandle, TransportProbe) {
    let (transport, probe) = RecordingTransport::new();
    let handle = ConnectionHandle::new(Box::new(transport), DEFAULT_SEND_TIMEOUT);
    (handle, probe)
}

/// Arc に包んだ接続ハンドルとプローブを作成
pub(crate) fn test_handle_arc() -> (std::sync::Arc<ConnectionHandle>, TransportProbe) {
    let (handle, probe) = test_handle();
    (std::sync::Arc::new(handle), probe)
}
