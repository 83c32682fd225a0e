//! 接続レジストリ定義
//!
//! 現在接続中のクライアントを保持する並行マップ。キーは接続 ID であり、
//! ユーザー名ではありません（同名ユーザーの同時接続を許容する）。
//!
//! ## 並行性
//!
//! すべてのミューテーション（add / remove）は短いクリティカルセクションの
//! 単一ロックで直列化されます。イテレーションはスナップショット方式：
//! `snapshot()` が呼び出し時点のエントリを複製して返すため、受信者ごとの
//! 送信（遅い可能性がある）中にマップのロックを保持しません。
//! スナップショット中に追加・削除されたエントリは次のスナップショットで
//! 観測されます（join/leave の可視性は結果整合）。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::connection::ConnectionHandle;
use super::entity::Identity;
use super::error::RegistryError;
use super::value_object::{ConnectionId, Timestamp};

/// レジストリエントリ
///
/// 不変条件: 1 つの接続ハンドルは同時に高々 1 エントリ。挿入は認証成功後
/// のみ。削除はちょうど 1 回（読み取り失敗またはブロードキャスト中の
/// 書き込み失敗のどちらか一方が行う）。
#[derive(Clone)]
pub struct RegistryEntry {
    pub handle: Arc<ConnectionHandle>,
    pub identity: Identity,
    pub connected_at: Timestamp,
}

/// 接続レジストリ
///
/// グローバル状態としてではなく明示的な値として構築し、ブロードキャスト
/// エンジンやユースケースに注入する（1 プロセス内で独立した複数の
/// レジストリをテストできる）。
pub struct ClientRegistry {
    entries: Mutex<HashMap<ConnectionId, RegistryEntry>>,
}

impl ClientRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// エントリを追加する
    ///
    /// 同じ接続 ID が既に登録されている場合はエラー（プログラミングエラー。
    /// 認証成功後の挿入経路は接続ごとに 1 回しか通らないため、通常発生
    /// しない）。
    pub async fn add(
        &self,
        handle: Arc<ConnectionHandle>,
        identity: Identity,
        connected_at: Timestamp,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        let id = handle.id();
        if entries.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        entries.insert(
            id,
            RegistryEntry {
                handle,
                identity,
                connected_at,
            },
        );
        Ok(())
    }

    /// エントリを削除する（冪等）
    ///
    /// 存在していれば削除して true、存在しなければ何もせず false を返す。
    /// 戻り値は重複した leave ブロードキャストの抑制に使われる。
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let mut entries = self.entries.lock().await;
        entries.remove(&id).is_some()
    }

    /// 呼び出し時点のエントリのスナップショットを取得
    ///
    /// 返されたスナップショットのイテレーション中にレジストリが変更されても
    /// 安全（コピーオンリード）。削除完了が観測されたエントリが以降の
    /// スナップショットに現れることはない。
    pub async fn snapshot(&self) -> Vec<(Arc<ConnectionHandle>, Identity)> {
        let entries = self.entries.lock().await;
        entries
            .values()
            .map(|entry| (entry.handle.clone(), entry.identity.clone()))
            .collect()
    }

    /// 接続中クライアントの一覧を取得（ユーザー名でソート済み）
    pub async fn connected_clients(&self) -> Vec<(Identity, Timestamp)> {
        let entries = self.entries.lock().await;
        let mut clients: Vec<(Identity, Timestamp)> = entries
            .values()
            .map(|entry| (entry.identity.clone(), entry.connected_at))
            .collect();
        clients.sort_by(|a, b| a.0.username.cmp(&b.0.username));
        clients
    }

    /// 登録されているエントリ数
    ///
    /// 不変条件: 認証済みかつ未切断の接続数と常に一致する。
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }

    /// レジストリが空かどうか
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
