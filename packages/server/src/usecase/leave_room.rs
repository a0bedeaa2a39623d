//! UseCase: Room 退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 退出処理（参加者削除、チャンネル登録解除、通知対象選定）
//!
//! ### なぜこのテストが必要か
//! - 退出は常に成功しなければならない（接続の後始末をブロックしない）
//! - Member の情報が復元できない場合でも削除と登録解除は行われることを保証
//! - 退出通知が残りの参加者だけに送られることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：最後の参加者の退出（通知対象なし）
//! - 異常系：参加者情報が見つからない接続の退出（通知はスキップ、削除は続行）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Member, MessagePusher, PushOutcome, RoomName, RoomRepository,
};

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（参加者集合の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room からの退出を実行（常に成功する）
    ///
    /// 参加者集合からの削除と送信チャンネルの登録解除は無条件に行う。
    ///
    /// # Arguments
    ///
    /// * `room` - 退出元の Room 名
    /// * `id` - 退出する接続の ID
    ///
    /// # Returns
    ///
    /// * `Some((Member, Vec<ConnectionId>))` - 削除した Member と通知対象
    /// * `None` - Member の情報が復元できなかった（呼び出し側は退出通知をスキップする）
    pub async fn execute(
        &self,
        room: &RoomName,
        id: &ConnectionId,
    ) -> Option<(Member, Vec<ConnectionId>)> {
        // 1. 参加者集合から削除（見つからなくても後続の解除は続行）
        let removed = self.repository.remove_member(room, id).await;

        // 2. 送信チャンネルを登録解除
        self.message_pusher.unregister_client(id).await;

        // 3. 通知対象を選定（削除後に残っている全参加者）
        let removed = removed?;
        let targets = self
            .repository
            .get_members(room)
            .await
            .into_iter()
            .map(|m| m.id)
            .collect();

        Some((removed, targets))
    }

    /// 退出したことを残りの参加者にブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `targets` - ブロードキャスト対象の接続 ID リスト
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_left(
        &self,
        targets: Vec<ConnectionId>,
        message: &str,
    ) -> Vec<PushOutcome> {
        self.message_pusher.broadcast(targets, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use tokio::sync::mpsc;

    async fn setup_room_with_members(
        repository: &InMemoryRoomRepository,
        room: &RoomName,
        ids: &[&str],
    ) {
        repository.resolve_room(room.clone(), Timestamp::new(0)).await;
        for id in ids {
            repository
                .add_member(
                    room,
                    Member::new(
                        ConnectionId::new(id.to_string()),
                        DisplayName::parse(*id),
                        Timestamp::new(0),
                    ),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_leave_removes_member_and_returns_notify_targets() {
        // テスト項目: 参加者が退出でき、残りの参加者が通知対象として返される
        // given (前提条件): alice, bob, charlie が参加中
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice", "bob", "charlie"]).await;
        let usecase = LeaveRoomUseCase::new(repository.clone(), pusher);

        // when (操作): alice が退出
        let alice = ConnectionId::new("alice".to_string());
        let result = usecase.execute(&room, &alice).await;

        // then (期待する結果):
        let (removed, targets) = result.unwrap();
        assert_eq!(removed.name.as_str(), "alice");

        // alice 以外の 2 人が通知対象
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&ConnectionId::new("bob".to_string())));
        assert!(targets.contains(&ConnectionId::new("charlie".to_string())));
        assert!(!targets.contains(&alice));

        // Repository から削除されている
        assert_eq!(repository.get_members(&room).await.len(), 2);
    }

    #[tokio::test]
    async fn test_leave_last_member_has_no_notify_targets() {
        // テスト項目: 最後の参加者が退出した場合、通知対象は空
        // given (前提条件): alice のみ参加
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice"]).await;
        let usecase = LeaveRoomUseCase::new(repository.clone(), pusher);

        // when (操作):
        let alice = ConnectionId::new("alice".to_string());
        let result = usecase.execute(&room, &alice).await;

        // then (期待する結果):
        let (_removed, targets) = result.unwrap();
        assert_eq!(targets.len(), 0);
        assert_eq!(repository.get_members(&room).await.len(), 0);
    }

    #[tokio::test]
    async fn test_leave_unknown_member_skips_notice_but_unregisters() {
        // テスト項目: 参加者情報が見つからない場合は None が返り、チャンネルは解除される
        // given (前提条件): Room はあるが該当の参加者はいない
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice"]).await;

        // 未参加の接続のチャンネルだけが登録されている状態を作る
        let ghost = ConnectionId::new("ghost".to_string());
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(ghost.clone(), tx).await;
        let usecase = LeaveRoomUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        let result = usecase.execute(&room, &ghost).await;

        // then (期待する結果): 通知はスキップされるが、チャンネルは解除済み
        assert!(result.is_none());
        assert!(pusher.push_to(&ghost, "ping").await.is_err());

        // 既存の参加者には影響しない
        assert_eq!(repository.get_members(&room).await.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_left_reaches_remaining_members() {
        // テスト項目: 退出通知が残りの参加者に届く
        // given (前提条件): alice, bob が参加中（実チャンネル付き）
        let repository = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice", "bob"]).await;
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        pusher
            .register_client(ConnectionId::new("bob".to_string()), tx_bob)
            .await;
        let usecase = LeaveRoomUseCase::new(repository.clone(), pusher);

        // when (操作): alice が退出し、退出通知をブロードキャスト
        let alice = ConnectionId::new("alice".to_string());
        let (_removed, targets) = usecase.execute(&room, &alice).await.unwrap();
        let outcomes = usecase
            .broadcast_left(targets, r#"{"left":"alice"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
        assert_eq!(rx_bob.recv().await, Some(r#"{"left":"alice"}"#.to_string()));
    }
}
