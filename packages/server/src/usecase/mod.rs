//! ユースケース層
//!
//! 接続ライフサイクルの各遷移を 1 ユースケース 1 モジュールで実装します：
//! - `AuthenticateClientUseCase`: 認証ハンドシェイク（Authenticating）
//! - `ConnectClientUseCase`: レジストリへの登録と参加通知（→ Active）
//! - `SendMessageUseCase`: メッセージの永続化とブロードキャスト（Active）
//! - `DisconnectClientUseCase`: 登録解除と離脱通知（→ Closed）

mod authenticate_client;
mod connect_client;
mod disconnect_client;
mod error;
mod send_message;

pub use authenticate_client::AuthenticateClientUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::ConnectError;
pub use send_message::SendMessageUseCase;
