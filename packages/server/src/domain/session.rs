//! セッション検証のインターフェース定義
//!
//! クレデンシャルの保管・ハッシュ化・トークン発行は外部の認証サービスの
//! 責務であり、コアはこの trait を通じてトークン検証のみを依頼します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::Identity;
use super::error::AuthError;
use super::value_object::{SessionToken, UserId};

/// セッション検証サービス
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// セッショントークンを検証し、ユーザー ID と身元情報を返す
    ///
    /// トークンが無効・期限切れの場合は `AuthError::InvalidToken`。
    async fn validate_token(&self, token: &SessionToken) -> Result<(UserId, Identity), AuthError>;
}
