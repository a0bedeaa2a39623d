//! ドメインエンティティ定義
//!
//! Room は「現在の参加者集合」だけを持ちます。メッセージ履歴は接続の寿命とは
//! 独立に保持する必要があるため、HistoryStore（Durable なログ）側が所有します。

use serde::Serialize;

use super::value_object::{ConnectionId, DisplayName, MessageBody, RoomName, Timestamp};

/// Room に参加中の 1 接続
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    /// 接続を識別するトークン（join 時に発行）
    pub id: ConnectionId,
    /// 表示名
    pub name: DisplayName,
    /// 参加時刻（Unix ミリ秒）
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(id: ConnectionId, name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            joined_at,
        }
    }
}

/// 1 件のチャットメッセージ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// 本文（バリデーション済み）
    pub body: MessageBody,
    /// 送信者の表示名
    pub sender: DisplayName,
    /// サーバーが割り当てたタイムスタンプ（Room 内で狭義単調増加）
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(body: MessageBody, sender: DisplayName, timestamp: Timestamp) -> Self {
        Self {
            body,
            sender,
            timestamp,
        }
    }
}

/// Room エンティティ
///
/// 参加者集合の変更は所有する Repository 実装を通してのみ行われます。
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    /// Room 名（正規化済み）
    pub name: RoomName,
    /// 初回解決時刻
    pub created_at: Timestamp,
    /// 現在の参加者
    pub members: Vec<Member>,
}

impl Room {
    /// 参加者のいない新しい Room を作成
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            created_at,
            members: Vec::new(),
        }
    }

    /// 参加者を追加
    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// 参加者を削除し、削除した Member を返す
    pub fn remove_member(&mut self, id: &ConnectionId) -> Option<Member> {
        let index = self.members.iter().position(|m| &m.id == id)?;
        Some(self.members.remove(index))
    }

    /// 参加者を接続 ID で検索
    pub fn find_member(&self, id: &ConnectionId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// 現在の参加者数
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
