//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受理されたメッセージの永続化とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：永続化と配送は独立した 2 つの効果である
//! - 永続化の失敗が配送にも接続にも影響しないことを保証
//! - ブロードキャストされるイベントに送信元のユーザー名が付与されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージの保存とブロードキャスト
//! - 異常系：Repository の保存失敗（ログのみ、配送は継続）

use std::sync::Arc;

use crate::domain::{
    BroadcastEngine, Event, Identity, MessageContent, MessageRepository, Timestamp, UserId,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// BroadcastEngine（ブロードキャストエンジン）
    engine: Arc<BroadcastEngine>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn MessageRepository>, engine: Arc<BroadcastEngine>) -> Self {
        Self { repository, engine }
    }

    /// メッセージ送信を実行
    ///
    /// 永続化とブロードキャストを独立した効果として並行に実行する。
    /// 永続化の失敗はログに記録されるのみで、配送にも接続にも影響しない。
    ///
    /// # Arguments
    ///
    /// * `user_id` - 送信者のユーザー ID（永続化の紐付けに使う）
    /// * `sender` - 送信者の身元情報（ブロードキャストに付与される）
    /// * `content` - メッセージ本文
    pub async fn execute(&self, user_id: UserId, sender: &Identity, content: MessageContent) {
        use idobata_shared::time::get_jst_timestamp;

        let event = Event::message_from(sender.username.clone(), content.clone());

        let persist = async {
            let created_at = Timestamp::new(get_jst_timestamp());
            if let Err(e) = self
                .repository
                .store_message(user_id, &content, created_at)
                .await
            {
                tracing::warn!(
                    "failed to persist message from '{}': {}",
                    sender.username.as_str(),
                    e
                );
            }
        };
        let broadcast = self.engine.broadcast(event);

        tokio::join!(persist, broadcast);
    }
}
