//! チャットイベント定義
//!
//! ワイヤ上を流れるイベントをクローズドな直和型として表現します。
//! 種別ごとにコンストラクタ（バリアント）を持ち、未知・不正な種別は
//! デコード時（infrastructure 層の DTO 変換）にエラーとして弾かれます。
//!
//! `is_self` フラグは受信者ごとに再計算されます：イベントのユーザー名が
//! 受信者のユーザー名と一致するとき true。

use super::value_object::{MessageContent, SessionToken, Username};

/// チャットイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// サーバー → クライアント：認証フレームの送信を促す
    AuthRequest,
    /// クライアント → サーバー：最初のフレームでなければならない
    Auth { token: SessionToken },
    /// サーバー → クライアント：認証成功
    AuthSuccess { username: Username },
    /// サーバー → クライアント：認証失敗（この後接続は閉じられる）
    AuthFailed,
    /// チャットメッセージ
    ///
    /// クライアントからの受信時は `username` は無い（None）。
    /// ブロードキャスト時にサーバーが送信元のユーザー名を付与する。
    Message {
        username: Option<Username>,
        content: MessageContent,
        is_self: bool,
    },
    /// サーバー → クライアント：参加通知（ブロードキャストのみ）
    UserJoin { username: Username, is_self: bool },
    /// サーバー → クライアント：離脱通知（ブロードキャストのみ）
    UserLeave { username: Username, is_self: bool },
}

impl Event {
    /// メッセージイベントを作成（送信元のユーザー名を付与）
    pub fn message_from(username: Username, content: MessageContent) -> Self {
        Self::Message {
            username: Some(username),
            content,
            is_self: false,
        }
    }

    /// 参加イベントを作成
    pub fn user_join(username: Username) -> Self {
        Self::UserJoin {
            username,
            is_self: false,
        }
    }

    /// 離脱イベントを作成
    pub fn user_leave(username: Username) -> Self {
        Self::UserLeave {
            username,
            is_self: false,
        }
    }

    /// イベントに紐づくユーザー名（あれば）
    pub fn username(&self) -> Option<&Username> {
        match self {
            Self::AuthSuccess { username } => Some(username),
            Self::Message { username, .. } => username.as_ref(),
            Self::UserJoin { username, .. } => Some(username),
            Self::UserLeave { username, .. } => Some(username),
            _ => None,
        }
    }

    /// 受信者向けにイベントを複製し、`is_self` を再計算する
    ///
    /// イベントのユーザー名が受信者のユーザー名と一致するとき true。
    /// `is_self` を持たない種別はそのまま複製される。
    pub fn for_recipient(&self, recipient: &Username) -> Self {
        let is_self = self.username() == Some(recipient);
        match self {
            Self::Message {
                username, content, ..
            } => Self::Message {
                username: username.clone(),
                content: content.clone(),
                is_self,
            },
            Self::UserJoin { username, .. } => Self::UserJoin {
                username: username.clone(),
                is_self,
            },
            Self::UserLeave { username, .. } => Self::UserLeave {
                username: username.clone(),
                is_self,
            },
            other => other.clone(),
        }
    }
}
