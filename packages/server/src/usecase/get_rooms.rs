//! UseCase: Room 一覧取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（Room レジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// これまでに解決された全ての Room を取得（名前順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}
