//! エンティティ定義

use super::value_object::{MessageContent, Timestamp, UserId, Username};

/// 認証済みセッションの身元情報
///
/// 1 つの生きた接続ハンドルにちょうど 1 つ紐づき、
/// ハンドシェイクから切断までのセッション中は不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: Username,
}

impl Identity {
    pub fn new(username: Username) -> Self {
        Self { username }
    }
}

/// 永続化されたメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub user_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl StoredMessage {
    pub fn new(user_id: UserId, content: MessageContent, created_at: Timestamp) -> Self {
        Self {
            user_id,
            content,
            created_at,
        }
    }
}
