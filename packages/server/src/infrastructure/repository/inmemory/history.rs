//! InMemory HistoryStore 実装
//!
//! ドメイン層が定義する HistoryStore trait の具体的な実装。
//! Room 名をキーに追記専用の Vec をインメモリのログとして使用します。
//!
//! ## タイムスタンプの調整
//!
//! クロックの分解能がメッセージレートより粗い場合、複数のメッセージが
//! 同じタイムスタンプを提案してくることがあります。ログの順序キーとして
//! 使えるよう、直前のメッセージ以下のタイムスタンプは `last + 1` に
//! 調整してから保存します（到着順がそのまま全順序になる）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryStore, RepositoryError, RoomName};

/// インメモリ HistoryStore 実装
pub struct InMemoryHistoryStore {
    /// Room 名 → メッセージログ（追記順）
    logs: Mutex<HashMap<RoomName, Vec<ChatMessage>>>,
}

impl InMemoryHistoryStore {
    /// 空のログを持つ新しい InMemoryHistoryStore を作成
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(
        &self,
        room: &RoomName,
        message: ChatMessage,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut logs = self.logs.lock().await;
        let log = logs.entry(room.clone()).or_default();

        let mut stored = message;
        if let Some(last) = log.last()
            && stored.timestamp <= last.timestamp
        {
            stored.timestamp = last.timestamp.next();
        }

        log.push(stored.clone());
        tracing::debug!(
            "Appended message from '{}' to room '{}' at {}",
            stored.sender,
            room,
            stored.timestamp.value()
        );
        Ok(stored)
    }

    async fn history(&self, room: &RoomName) -> Vec<ChatMessage> {
        let logs = self.logs.lock().await;
        logs.get(room).cloned().unwrap_or_default()
    }
}
