//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を接続 ID ごとに管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//!
//! これにより、「WebSocket の生成」と「メッセージの送信」が分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PushOutcome, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する WebSocket sender のマップ
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(id.clone(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", id);
    }

    async fn unregister_client(&self, id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", id);
    }

    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(id.as_str().to_string()))
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> Vec<PushOutcome> {
        let clients = self.clients.lock().await;

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            // 1 宛先の失敗は残りの宛先への配送を妨げない
            let result = match clients.get(&target) {
                Some(sender) => sender
                    .send(content.to_string())
                    .map_err(|e| MessagePushError::PushFailed(e.to_string())),
                None => Err(MessagePushError::ClientNotFound(
                    target.as_str().to_string(),
                )),
            };

            if let Err(e) = &result {
                tracing::warn!("Failed to push message to connection '{}': {}", target, e);
            } else {
                tracing::debug!("Broadcasted message to connection '{}'", target);
            }

            outcomes.push(PushOutcome { target, result });
        }

        outcomes
    }
}
