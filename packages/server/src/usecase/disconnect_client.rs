//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断処理（冪等な登録解除、離脱通知、接続のクローズ）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：切断時に残りの参加者へ user_leave が流れる
//! - ブロードキャスト中の退去と読み取りループの切断が競合しても
//!   user_leave が二重に流れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続中クライアントの切断と通知
//! - エッジケース：既に退去済みのクライアントの切断（通知は抑制される）

use std::sync::Arc;

use crate::domain::{BroadcastEngine, ClientRegistry, ConnectionHandle, Event, Identity};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// ClientRegistry（接続レジストリ）
    registry: Arc<ClientRegistry>,
    /// BroadcastEngine（ブロードキャストエンジン）
    engine: Arc<BroadcastEngine>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(registry: Arc<ClientRegistry>, engine: Arc<BroadcastEngine>) -> Self {
        Self { registry, engine }
    }

    /// クライアント切断を実行
    ///
    /// レジストリからの削除は冪等。この呼び出しで削除が観測された
    /// （まだ誰も削除していなかった）場合のみ `user_leave` を
    /// ブロードキャストする。接続のクローズも冪等。
    ///
    /// # Returns
    ///
    /// この呼び出しで削除が行われたかどうか
    pub async fn execute(&self, handle: Arc<ConnectionHandle>, identity: Identity) -> bool {
        let was_present = self.registry.remove(handle.id()).await;
        handle.close().await;

        if was_present {
            self.engine
                .broadcast(Event::user_leave(identity.username))
                .await;
        }

        was_present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use crate::domain::Username;
    use crate::domain::test_support::test_handle_arc;

    fn identity(name: &str) -> Identity {
        Identity::new(Username::new(name.to_string()).unwrap())
    }

    fn create_usecase() -> (DisconnectClientUseCase, Arc<ClientRegistry>) {
        let registry = Arc::new(ClientRegistry::new());
        let engine = Arc::new(BroadcastEngine::new(registry.clone()));
        (
            DisconnectClientUseCase::new(registry.clone(), engine),
            registry,
        )
    }

    #[tokio::test]
    async fn test_disconnect_removes_and_notifies() {
        // テスト項目: 切断で登録が解除され、残りの参加者に user_leave が流れる
        // given (前提条件): alice と bob が接続中
        let (usecase, registry) = create_usecase();
        let (handle_alice, _probe_alice) = test_handle_arc();
        let (handle_bob, probe_bob) = test_handle_arc();
        registry
            .add(handle_alice.clone(), identity("alice"), Timestamp::new(1))
            .await
            .unwrap();
        registry
            .add(handle_bob, identity("bob"), Timestamp::new(2))
            .await
            .unwrap();

        // when (操作): alice が切断する
        let removed = usecase.execute(handle_alice.clone(), identity("alice")).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(registry.len().await, 1);
        assert!(handle_alice.is_closed());

        let bob_events = probe_bob.sent_events();
        assert_eq!(bob_events.len(), 1);
        match &bob_events[0] {
            Event::UserLeave { username, is_self } => {
                assert_eq!(username.as_str(), "alice");
                assert!(!is_self);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_already_removed_suppresses_leave() {
        // テスト項目: 既に退去済みの接続の切断では user_leave が流れない
        // given (前提条件): alice はブロードキャスト退去などで削除済み
        let (usecase, registry) = create_usecase();
        let (handle_alice, _probe_alice) = test_handle_arc();
        let (handle_bob, probe_bob) = test_handle_arc();
        registry
            .add(handle_alice.clone(), identity("alice"), Timestamp::new(1))
            .await
            .unwrap();
        registry
            .add(handle_bob, identity("bob"), Timestamp::new(2))
            .await
            .unwrap();
        registry.remove(handle_alice.id()).await;

        // when (操作): alice の読み取りループが切断処理を行う
        let removed = usecase.execute(handle_alice, identity("alice")).await;

        // then (期待する結果): 削除は no-op で、bob に通知は流れない
        assert!(!removed);
        assert!(probe_bob.sent_events().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_twice_notifies_once() {
        // テスト項目: 同じ接続の切断を 2 回実行しても user_leave は 1 回だけ流れる
        // given (前提条件):
        let (usecase, registry) = create_usecase();
        let (handle_alice, _probe_alice) = test_handle_arc();
        let (handle_bob, probe_bob) = test_handle_arc();
        registry
            .add(handle_alice.clone(), identity("alice"), Timestamp::new(1))
            .await
            .unwrap();
        registry
            .add(handle_bob, identity("bob"), Timestamp::new(2))
            .await
            .unwrap();

        // when (操作):
        let first = usecase
            .execute(handle_alice.clone(), identity("alice"))
            .await;
        let second = usecase.execute(handle_alice, identity("alice")).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        let leave_count = probe_bob
            .sent_events()
            .iter()
            .filter(|event| matches!(event, Event::UserLeave { .. }))
            .count();
        assert_eq!(leave_count, 1);
    }
}
