//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信インターフェース。
//! 具体的な実装（WebSocket の sender 管理）は Infrastructure 層が提供します。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// ブロードキャストにおける 1 宛先ごとの送信結果
///
/// fire-and-forget でエラーを握りつぶす代わりに、呼び出し側が
/// 「どの宛先に失敗したか」を検査できる形で返します。
#[derive(Debug, Clone)]
pub struct PushOutcome {
    /// 宛先の接続 ID
    pub target: ConnectionId,
    /// 送信結果
    pub result: Result<(), MessagePushError>,
}

impl PushOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// MessagePusher trait
///
/// ## 部分失敗の扱い
///
/// `broadcast` は宛先ごとの結果リストを返す。1 宛先への送信失敗は
/// 他の宛先への配送を妨げない（切断済みの接続が 1 つあっても
/// 残りの全員にはメッセージが届く）。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, id: &ConnectionId);

    /// 特定のクライアントへ送信
    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントへ送信し、宛先ごとの結果を返す
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<PushOutcome>;
}
