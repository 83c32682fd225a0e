//! WebSocket ワイヤイベントの DTO
//!
//! 1 フレーム = 1 JSON イベント。`type` タグで種別を判別する
//! クローズドな直和型として定義し、未知のタグや必須フィールドの欠落は
//! デコードエラーになります（黙って素通しすることはない）。
//!
//! ## ワイヤスキーマ
//!
//! | type                   | fields                        | direction            |
//! |------------------------|-------------------------------|----------------------|
//! | auth_request           | -                             | server -> client     |
//! | auth                   | token                         | client -> server（最初のフレーム） |
//! | auth_success           | username                      | server -> client     |
//! | auth_failed            | -                             | server -> client     |
//! | message                | content (+ username, is_self) | 双方向（username と is_self はブロードキャスト時に付与） |
//! | user_join / user_leave | username, is_self             | server -> clients    |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Event, ValidationError};

/// ワイヤ上のイベント表現
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    AuthRequest,
    Auth {
        token: String,
    },
    AuthSuccess {
        username: String,
    },
    AuthFailed,
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        content: String,
        #[serde(default)]
        is_self: bool,
    },
    UserJoin {
        username: String,
        #[serde(default)]
        is_self: bool,
    },
    UserLeave {
        username: String,
        #[serde(default)]
        is_self: bool,
    },
}

/// ワイヤイベントのデコードエラー
#[derive(Debug, Error)]
pub enum DecodeError {
    /// JSON として不正、またはタグ・必須フィールドが不正
    #[error("malformed event frame: {0}")]
    Malformed(String),
    /// フィールド値がドメインの制約に違反
    #[error(transparent)]
    InvalidField(#[from] ValidationError),
}

/// テキストフレームをデコードしてドメインイベントに変換する
pub fn decode_event(text: &str) -> Result<Event, DecodeError> {
    let wire: WireEvent =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    Event::try_from(wire)
}

/// ドメインイベントを 1 フレーム分の JSON にエンコードする
pub fn encode_event(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireEvent::from(event.clone()))
}
