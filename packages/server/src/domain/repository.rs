//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::error::PersistError;
use super::value_object::{MessageContent, Timestamp, UserId};

/// Message Repository trait
///
/// 受理されたメッセージをベストエフォートで永続化する。永続化の失敗は
/// ログに記録されるのみで、ブロードキャストや接続状態とは独立
/// （両者をまたぐトランザクションは存在しない）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存する
    async fn store_message(
        &self,
        user_id: UserId,
        content: &MessageContent,
        created_at: Timestamp,
    ) -> Result<(), PersistError>;
}
