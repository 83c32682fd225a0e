//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! Vec をインメモリ DB として使用します。永続化はベストエフォートの
//! コラボレータであり、この実装はバイナリの配線とテストのための
//! スタンドインです。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    MessageContent, MessageRepository, PersistError, StoredMessage, Timestamp, UserId,
};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    /// 保存されたメッセージ（受理順）
    messages: Mutex<Vec<StoredMessage>>,
}

impl InMemoryMessageRepository {
    /// 空の Repository を作成
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// 保存されたメッセージのコピーを取得
    pub async fn stored_messages(&self) -> Vec<StoredMessage> {
        let messages = self.messages.lock().await;
        messages.clone()
    }

    /// 保存されたメッセージ数
    pub async fn count(&self) -> usize {
        let messages = self.messages.lock().await;
        messages.len()
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store_message(
        &self,
        user_id: UserId,
        content: &MessageContent,
        created_at: Timestamp,
    ) -> Result<(), PersistError> {
        let mut messages = self.messages.lock().await;
        messages.push(StoredMessage::new(user_id, content.clone(), created_at));
        Ok(())
    }
}
