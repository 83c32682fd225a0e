//! インメモリ Repository 実装

mod message;

pub use message::InMemoryMessageRepository;
