//! Server state and connection management.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ClientRegistry;
use crate::usecase::{
    AuthenticateClientUseCase, ConnectClientUseCase, DisconnectClientUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// AuthenticateClientUseCase（認証ハンドシェイクのユースケース）
    pub authenticate_client_usecase: Arc<AuthenticateClientUseCase>,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// ClientRegistry（接続中クライアント一覧の読み取りに使用）
    pub registry: Arc<ClientRegistry>,
    /// 1 受信者への書き込みタイムアウト
    pub send_timeout: Duration,
}
