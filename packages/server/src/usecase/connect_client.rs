//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 認証成功後の接続処理（レジストリ登録、auth_success 送信、参加通知）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：登録 → 本人への auth_success → user_join の順序
//! - 本人への送信に失敗した接続が登録されたまま残らないことを保証
//! - 二重登録（プログラミングエラー）がエラーとして検出されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：認証済みクライアントの登録と通知
//! - 異常系：auth_success の送信失敗、同一ハンドルの二重登録

use std::sync::Arc;

use crate::domain::{
    BroadcastEngine, ClientRegistry, ConnectionHandle, Event, Identity, Timestamp,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// ClientRegistry（接続レジストリ）
    registry: Arc<ClientRegistry>,
    /// BroadcastEngine（ブロードキャストエンジン）
    engine: Arc<BroadcastEngine>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(registry: Arc<ClientRegistry>, engine: Arc<BroadcastEngine>) -> Self {
        Self { registry, engine }
    }

    /// クライアント接続を実行
    ///
    /// レジストリへの登録、本人への `auth_success` 送信、全接続への
    /// `user_join` ブロードキャストを順に行う。登録後に本人への送信が
    /// 失敗した場合は登録を取り消して接続を閉じる（他の参加者が join を
    /// 観測する前に退去させる）。
    ///
    /// # Arguments
    ///
    /// * `handle` - 認証済み接続のハンドル
    /// * `identity` - 認証で得られた身元情報
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        handle: Arc<ConnectionHandle>,
        identity: Identity,
    ) -> Result<Timestamp, ConnectError> {
        use idobata_shared::time::get_jst_timestamp;

        // 1. レジストリに登録（認証成功後のみ挿入される）
        let connected_at = Timestamp::new(get_jst_timestamp());
        self.registry
            .add(handle.clone(), identity.clone(), connected_at)
            .await?;

        // 2. 本人に auth_success を送信
        let response = Event::AuthSuccess {
            username: identity.username.clone(),
        };
        if let Err(e) = handle.send(&response).await {
            self.registry.remove(handle.id()).await;
            handle.close().await;
            return Err(ConnectError::SendFailed(e));
        }

        // 3. 全接続（本人を含む）に user_join をブロードキャスト
        self.engine
            .broadcast(Event::user_join(identity.username))
            .await;

        Ok(connected_at)
    }
}
