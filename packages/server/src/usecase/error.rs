//! ユースケース層のエラー定義

use thiserror::Error;

use crate::domain::{RegistryError, SendError};

/// クライアント接続（レジストリ登録）のエラー
#[derive(Debug, Error)]
pub enum ConnectError {
    /// 同じ接続ハンドルが既に登録されている（プログラミングエラー）
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// 認証成功応答を本人に送れなかった（接続は破棄される）
    #[error("failed to deliver auth response: {0}")]
    SendFailed(#[from] SendError),
}
