//! InMemory SessionValidator 実装
//!
//! トークン → (ユーザー ID, ユーザー名) のインメモリテーブルで
//! `SessionValidator` trait を実装します。クレデンシャルの保管や
//! トークン発行は外部サービスの責務のため、この実装は起動時に
//! シードされたセッションの照合のみを行います（バイナリの配線と
//! テストのためのスタンドイン）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AuthError, Identity, SessionToken, SessionValidator, UserId, Username};

/// インメモリ SessionValidator 実装
pub struct InMemorySessionValidator {
    /// トークン文字列 → (ユーザー ID, ユーザー名)
    sessions: Mutex<HashMap<String, (UserId, Username)>>,
}

impl InMemorySessionValidator {
    /// 空のセッションテーブルで作成
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// セッションを登録する
    pub async fn register_session(&self, token: SessionToken, user_id: UserId, username: Username) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token.as_str().to_string(), (user_id, username));
    }
}

impl Default for InMemorySessionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionValidator for InMemorySessionValidator {
    async fn validate_token(&self, token: &SessionToken) -> Result<(UserId, Identity), AuthError> {
        let sessions = self.sessions.lock().await;
        match sessions.get(token.as_str()) {
            Some((user_id, username)) => Ok((*user_id, Identity::new(username.clone()))),
            None => Err(AuthError::InvalidToken),
        }
    }
}
