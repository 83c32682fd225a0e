//! HTTP API レスポンスの DTO

use serde::Serialize;

/// 接続中クライアント 1 件分の情報
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedClientDto {
    pub username: String,
    /// 接続時刻（JST, RFC 3339）
    pub connected_at: String,
}

/// 接続中クライアント一覧のレスポンス
#[derive(Debug, Clone, Serialize)]
pub struct ClientListDto {
    pub count: usize,
    pub clients: Vec<ConnectedClientDto>,
}
