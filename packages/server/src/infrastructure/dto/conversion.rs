//! Conversion logic between wire DTOs and domain events.

use crate::domain::{Event, MessageContent, SessionToken, Username};
use crate::infrastructure::dto::websocket::{DecodeError, WireEvent};

// ========================================
// DTO → Domain Event（フィールド値のバリデーションを伴う）
// ========================================

impl TryFrom<WireEvent> for Event {
    type Error = DecodeError;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let event = match wire {
            WireEvent::AuthRequest => Event::AuthRequest,
            WireEvent::Auth { token } => Event::Auth {
                token: SessionToken::new(token)?,
            },
            WireEvent::AuthSuccess { username } => Event::AuthSuccess {
                username: Username::new(username)?,
            },
            WireEvent::AuthFailed => Event::AuthFailed,
            WireEvent::Message {
                username,
                content,
                is_self,
            } => Event::Message {
                username: username.map(Username::new).transpose()?,
                content: MessageContent::new(content)?,
                is_self,
            },
            WireEvent::UserJoin { username, is_self } => Event::UserJoin {
                username: Username::new(username)?,
                is_self,
            },
            WireEvent::UserLeave { username, is_self } => Event::UserLeave {
                username: Username::new(username)?,
                is_self,
            },
        };
        Ok(event)
    }
}

// ========================================
// Domain Event → DTO（常に成功する）
// ========================================

impl From<Event> for WireEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::AuthRequest => WireEvent::AuthRequest,
            Event::Auth { token } => WireEvent::Auth {
                token: token.as_str().to_string(),
            },
            Event::AuthSuccess { username } => WireEvent::AuthSuccess {
                username: username.into_string(),
            },
            Event::AuthFailed => WireEvent::AuthFailed,
            Event::Message {
                username,
                content,
                is_self,
            } => WireEvent::Message {
                username: username.map(Username::into_string),
                content: content.into_string(),
                is_self,
            },
            Event::UserJoin { username, is_self } => WireEvent::UserJoin {
                username: username.into_string(),
                is_self,
            },
            Event::UserLeave { username, is_self } => WireEvent::UserLeave {
                username: username.into_string(),
                is_self,
            },
        }
    }
}
