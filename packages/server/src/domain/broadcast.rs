//! ブロードキャストエンジン定義
//!
//! 1 つのイベントを、レジストリのスナップショットに含まれる全接続へ
//! 配送します。受信者ごとに `is_self` を再計算し、配送は受信者間で独立：
//! 1 受信者の送信失敗が他の受信者への配送を中断することはありません。
//!
//! ## 退去（eviction）
//!
//! 送信失敗は、まだ読み取り失敗を報告していない接続を退去させる唯一の
//! シグナルです。失敗した受信者はレジストリから削除（冪等）され、
//! ハンドルが閉じられます。削除がこの呼び出しで観測された（remove が
//! true を返した）場合のみ、その身元の `user_leave` を後続で 1 回だけ
//! ブロードキャストします。退去の連鎖は再帰ではなくワークキューで処理
//! します。
//!
//! 配送順序の保証は「ブロードキャスト呼び出しの受理順 = 全受信者への
//! 書き込み順」のみ（単一のグローバル呼び出し順。受信者ごとの並べ替えは
//! しない）。

use std::collections::VecDeque;
use std::sync::Arc;

use super::entity::Identity;
use super::event::Event;
use super::registry::ClientRegistry;

/// ブロードキャストエンジン
pub struct BroadcastEngine {
    registry: Arc<ClientRegistry>,
}

impl BroadcastEngine {
    /// レジストリを注入してエンジンを作成
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// イベントを全登録接続へ配送する
    ///
    /// 配送中に退去が発生した場合、退去した参加者の `user_leave` も
    /// 続けて配送される。
    pub async fn broadcast(&self, event: Event) {
        let mut queue = VecDeque::new();
        queue.push_back(event);

        while let Some(event) = queue.pop_front() {
            for evicted in self.deliver(&event).await {
                queue.push_back(Event::user_leave(evicted.username));
            }
        }
    }

    /// 1 イベントをスナップショットの全受信者に配送し、退去した身元を返す
    ///
    /// スナップショット方式のため、受信者ごとの送信中にレジストリの
    /// ロックは保持しない。
    async fn deliver(&self, event: &Event) -> Vec<Identity> {
        let mut evicted = Vec::new();

        for (handle, identity) in self.registry.snapshot().await {
            let personalized = event.for_recipient(&identity.username);
            if let Err(e) = handle.send(&personalized).await {
                tracing::warn!(
                    "failed to broadcast to '{}' (connection {}): {}",
                    identity.username.as_str(),
                    handle.id(),
                    e
                );
                // 書き込み失敗 = この受信者の退去。削除は冪等で、
                // 読み取りループ側の切断処理と二重に leave を流さない。
                let removed = self.registry.remove(handle.id()).await;
                handle.close().await;
                if removed {
                    evicted.push(identity);
                }
            }
        }

        evicted
    }
}
