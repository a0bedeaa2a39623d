//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! Room 名をキーとする HashMap をインメモリのレジストリとして使用します。
//!
//! ## Room の解決について
//!
//! `resolve_room` はレジストリのロックを保持したまま entry API で
//! get-or-create を行うため、同名の並行した初回解決でも Room が
//! 二重に作られることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, RepositoryError, Room, RoomName, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// Room ドメインモデルをレジストリとして保持し、ドメイン層の
/// RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    /// Room 名 → Room のレジストリ
    rooms: Mutex<HashMap<RoomName, Room>>,
}

impl InMemoryRoomRepository {
    /// 空のレジストリを持つ新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn resolve_room(&self, name: RoomName, now: Timestamp) -> Room {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(name.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created", name);
                Room::new(name.clone(), now)
            })
            .clone()
    }

    async fn find_room(&self, name: &RoomName) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).cloned()
    }

    async fn add_member(&self, room: &RoomName, member: Member) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room)
            .ok_or_else(|| RepositoryError::RoomNotFound(room.as_str().to_string()))?;
        room.add_member(member);
        Ok(())
    }

    async fn remove_member(&self, room: &RoomName, id: &ConnectionId) -> Option<Member> {
        let mut rooms = self.rooms.lock().await;
        rooms.get_mut(room)?.remove_member(id)
    }

    async fn get_members(&self, room: &RoomName) -> Vec<Member> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        // Room 名でソートして一覧の順序を安定させる
        list.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        list
    }
}
