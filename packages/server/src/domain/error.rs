//! ドメイン層のエラー定義
//!
//! エラーはすべて単一接続のライフサイクルにスコープされます。
//! プロセス全体を停止させるエラーはこの層には存在しません。

use std::time::Duration;

use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} exceeds maximum length of {max}")]
    TooLong { field: &'static str, max: usize },
}

/// 認証ハンドシェイクのエラー
///
/// 接続は拒否され、トランスポートを閉じる以外の状態変更は行われない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// 最初のフレームが欠落・不正・auth 以外だった
    #[error("handshake failed: first event must be a valid auth event")]
    BadHandshake,
    /// セッション検証サービスがトークンを拒否した
    #[error("invalid session token")]
    InvalidToken,
}

/// トランスポートへの書き込みエラー
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode event: {0}")]
    Encode(String),
    #[error("failed to write to transport: {0}")]
    Write(String),
    #[error("failed to close transport: {0}")]
    Close(String),
}

/// 単一受信者への送信エラー
///
/// 送信失敗はその受信者の退去（eviction）のみを引き起こし、
/// 他の受信者への配送やメッセージの送信元には伝播しない。
#[derive(Debug, Error)]
pub enum SendError {
    #[error("connection already closed")]
    Closed,
    #[error("write timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// レジストリ操作のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// 同じ接続ハンドルの二重登録（プログラミングエラー。通常発生しない）
    #[error("connection {0} is already registered")]
    AlreadyRegistered(super::value_object::ConnectionId),
}

/// メッセージ永続化のエラー
///
/// ログに記録されるのみで、ブロードキャストや接続状態には影響しない。
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to store message: {0}")]
    Store(String),
}
