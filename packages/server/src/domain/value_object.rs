//! 値オブジェクト定義
//!
//! 不変条件を持つ小さな型を定義します。コンストラクタでバリデーションを行い、
//! 生成後は常に有効な値であることを保証します。

use std::fmt;

use uuid::Uuid;

use super::error::ValidationError;

/// ユーザー名の最大長（文字数）
const USERNAME_MAX_LEN: usize = 64;

/// メッセージ本文の最大長（文字数）
const MESSAGE_CONTENT_MAX_LEN: usize = 4096;

/// ユーザー名
///
/// 認証済みセッションに紐づく表示名。レジストリはユーザー名の一意性を
/// 強制しない（同名ユーザーの同時接続を許容する）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::Empty("username"));
        }
        if value.chars().count() > USERNAME_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: USERNAME_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// セッショントークン
///
/// 外部のセッション検証サービスが発行・検証する不透明な文字列。
/// サーバー本体はトークンの中身を解釈しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::Empty("token"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionToken {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// メッセージ本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::Empty("content"));
        }
        if value.chars().count() > MESSAGE_CONTENT_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MESSAGE_CONTENT_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザー ID
///
/// 外部の認証サービスが採番する ID。メッセージ永続化の紐付けに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 接続 ID
///
/// 接続ハンドルの同一性を表す。レジストリのキーはユーザー名ではなく
/// この ID（1 ハンドシェイク = 1 接続 ID、再接続では再利用しない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix タイムスタンプ（JST, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
