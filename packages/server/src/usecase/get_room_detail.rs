//! UseCase: Room 詳細取得処理

use std::sync::Arc;

use crate::domain::{ChatMessage, HistoryStore, Room, RoomName, RoomRepository};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（Room レジストリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// HistoryStore（メッセージ履歴の抽象化）
    history: Arc<dyn HistoryStore>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            repository,
            history,
        }
    }

    /// Room の詳細（参加者と履歴）を取得
    ///
    /// 照会で Room が作られることはない。
    ///
    /// # Returns
    ///
    /// * `Ok((Room, Vec<ChatMessage>))` - Room と履歴（追記順）
    /// * `Err(GetRoomDetailError::RoomNotFound)` - Room が存在しない
    pub async fn execute(
        &self,
        name: &RoomName,
    ) -> Result<(Room, Vec<ChatMessage>), GetRoomDetailError> {
        let room = self
            .repository
            .find_room(name)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let history = self.history.history(name).await;
        Ok((room, history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessageBody, Timestamp},
        infrastructure::repository::{InMemoryHistoryStore, InMemoryRoomRepository},
    };

    #[tokio::test]
    async fn test_get_room_detail_returns_room_and_history() {
        // テスト項目: Room の詳細と履歴が取得できる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let name = RoomName::parse("lobby");
        repository.resolve_room(name.clone(), Timestamp::new(1)).await;
        history
            .append(
                &name,
                ChatMessage::new(
                    MessageBody::new("hello".to_string()).unwrap(),
                    DisplayName::parse("alice"),
                    Timestamp::new(100),
                ),
            )
            .await
            .unwrap();
        let usecase = GetRoomDetailUseCase::new(repository, history);

        // when (操作):
        let result = usecase.execute(&name).await;

        // then (期待する結果):
        let (room, messages) = result.unwrap();
        assert_eq!(room.name.as_str(), "lobby");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body.as_str(), "hello");
    }

    #[tokio::test]
    async fn test_get_room_detail_for_unknown_room_fails() {
        // テスト項目: 存在しない Room の照会は RoomNotFound になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let usecase = GetRoomDetailUseCase::new(repository.clone(), history);

        // when (操作):
        let result = usecase.execute(&RoomName::parse("nowhere")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), GetRoomDetailError::RoomNotFound);

        // 照会で Room は作られていない
        assert!(repository.find_room(&RoomName::parse("nowhere")).await.is_none());
    }
}
