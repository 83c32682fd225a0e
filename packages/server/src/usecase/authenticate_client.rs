//! UseCase: 認証ハンドシェイク処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AuthenticateClientUseCase::execute() メソッド
//! - 認証ハンドシェイク（最初のイベントの検査、トークン検証の委譲）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：auth 以外の最初のフレームを拒否する
//! - トークン検証が外部サービスに正しく委譲されることを確認
//! - このユースケースがレジストリに一切触れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンでの認証成功
//! - 異常系：最初のフレームが欠落・auth 以外、トークンが無効

use std::sync::Arc;

use crate::domain::{AuthError, Event, Identity, SessionValidator, UserId};

/// 認証ハンドシェイクのユースケース
///
/// 新しくアップグレードされた接続で最初に受信したイベントが `auth` で
/// あることを要求し、トークン検証を外部のセッション検証サービスに
/// 委譲する。レジストリへの登録は呼び出し側の責務であり、この
/// ユースケースはレジストリを変更しない。
pub struct AuthenticateClientUseCase {
    /// SessionValidator（セッション検証サービスの抽象化）
    validator: Arc<dyn SessionValidator>,
}

impl AuthenticateClientUseCase {
    /// 新しい AuthenticateClientUseCase を作成
    pub fn new(validator: Arc<dyn SessionValidator>) -> Self {
        Self { validator }
    }

    /// 認証ハンドシェイクを実行
    ///
    /// # Arguments
    ///
    /// * `first_event` - 接続上で最初に受信（デコード）できたイベント。
    ///   受信できなかった・デコードできなかった場合は None
    ///
    /// # Returns
    ///
    /// * `Ok((UserId, Identity))` - 認証成功
    /// * `Err(AuthError::BadHandshake)` - 最初のイベントが欠落・不正・auth 以外
    /// * `Err(AuthError::InvalidToken)` - 検証サービスがトークンを拒否
    pub async fn execute(
        &self,
        first_event: Option<Event>,
    ) -> Result<(UserId, Identity), AuthError> {
        let token = match first_event {
            Some(Event::Auth { token }) => token,
            _ => return Err(AuthError::BadHandshake),
        };

        self.validator.validate_token(&token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::MockSessionValidator;
    use crate::domain::{MessageContent, SessionToken, Username};

    fn token(value: &str) -> SessionToken {
        SessionToken::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        // テスト項目: 有効なトークンの auth イベントで認証が成功する
        // given (前提条件):
        let mut validator = MockSessionValidator::new();
        validator
            .expect_validate_token()
            .withf(|t| t.as_str() == "T1")
            .times(1)
            .returning(|_| {
                Ok((
                    UserId::new(1),
                    Identity::new(Username::new("alice".to_string()).unwrap()),
                ))
            });
        let usecase = AuthenticateClientUseCase::new(Arc::new(validator));

        // when (操作):
        let result = usecase
            .execute(Some(Event::Auth { token: token("T1") }))
            .await;

        // then (期待する結果):
        let (user_id, identity) = result.unwrap();
        assert_eq!(user_id, UserId::new(1));
        assert_eq!(identity.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        // テスト項目: 検証サービスに拒否されたトークンはエラーになる
        // given (前提条件):
        let mut validator = MockSessionValidator::new();
        validator
            .expect_validate_token()
            .times(1)
            .returning(|_| Err(AuthError::InvalidToken));
        let usecase = AuthenticateClientUseCase::new(Arc::new(validator));

        // when (操作):
        let result = usecase
            .execute(Some(Event::Auth {
                token: token("expired"),
            }))
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_authenticate_missing_first_event() {
        // テスト項目: 最初のイベントが無い場合はハンドシェイク失敗になる
        // given (前提条件): 検証サービスは呼ばれないはず
        let validator = MockSessionValidator::new();
        let usecase = AuthenticateClientUseCase::new(Arc::new(validator));

        // when (操作):
        let result = usecase.execute(None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::BadHandshake);
    }

    #[tokio::test]
    async fn test_authenticate_non_auth_first_event() {
        // テスト項目: 最初のイベントが auth 以外の場合はハンドシェイク失敗になる
        // given (前提条件): 検証サービスは呼ばれないはず
        let validator = MockSessionValidator::new();
        let usecase = AuthenticateClientUseCase::new(Arc::new(validator));

        // when (操作):
        let result = usecase
            .execute(Some(Event::Message {
                username: None,
                content: MessageContent::new("hi".to_string()).unwrap(),
                is_self: false,
            }))
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AuthError::BadHandshake);
    }
}
