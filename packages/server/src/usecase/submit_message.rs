//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitMessageUseCase::execute() メソッド
//! - メッセージ送信処理（送信者の解決、履歴への追記、ブロードキャスト対象選定）
//!
//! ### なぜこのテストが必要か
//! - 「履歴への追記がブロードキャストに先行する」順序の保証
//!   （永続化されていないメッセージを他の参加者が観測してはならない）
//! - 送信者自身にメッセージがエコーバックされないことを保証
//! - Room ごとの分離（他の Room へ配送されないこと）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数参加者へのブロードキャスト
//! - エッジケース：送信者のみが参加している場合（ブロードキャスト対象なし）
//! - 異常系：Room に参加していない接続からの送信

use std::sync::Arc;

use idobata_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, HistoryStore, MessageBody, MessagePusher, PushOutcome, RoomName,
    RoomRepository, Timestamp,
};

use super::error::SubmitError;

/// メッセージ送信のユースケース
pub struct SubmitMessageUseCase {
    /// Repository（参加者集合の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// HistoryStore（メッセージ履歴の抽象化）
    history: Arc<dyn HistoryStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SubmitMessageUseCase {
    /// 新しい SubmitMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        history: Arc<dyn HistoryStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            history,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 履歴への追記が完了してからブロードキャスト対象を返す。呼び出し側は
    /// 返り値の保存済みメッセージ（タイムスタンプ調整後）をシリアライズして
    /// `broadcast_message` に渡すこと。
    ///
    /// # Arguments
    ///
    /// * `room` - 送信先の Room 名
    /// * `sender_id` - 送信者の接続 ID
    /// * `body` - バリデーション済みのメッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok((ChatMessage, Vec<ConnectionId>))` - 保存済みメッセージとブロードキャスト対象
    /// * `Err(SubmitError)` - 送信失敗（履歴には何も追記されない）
    pub async fn execute(
        &self,
        room: &RoomName,
        sender_id: &ConnectionId,
        body: MessageBody,
    ) -> Result<(ChatMessage, Vec<ConnectionId>), SubmitError> {
        // 1. 送信者の表示名を解決
        let members = self.repository.get_members(room).await;
        let sender = members
            .iter()
            .find(|m| &m.id == sender_id)
            .ok_or_else(|| SubmitError::UnknownSender(room.as_str().to_string()))?;

        // 2. メッセージを構築して履歴へ追記（追記がブロードキャストに先行する）
        let message = ChatMessage::new(
            body,
            sender.name.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let stored = self.history.append(room, message).await?;

        // 3. ブロードキャスト対象を選定（送信者以外の全参加者）
        let targets = members
            .into_iter()
            .filter(|m| &m.id != sender_id)
            .map(|m| m.id)
            .collect();

        Ok((stored, targets))
    }

    /// 保存済みメッセージを対象へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `targets` - ブロードキャスト対象の接続 ID リスト
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_message(
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
        domain::{DisplayName, Member, MockMessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryHistoryStore, InMemoryRoomRepository},
        },
    };
    use idobata_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn body(text: &str) -> MessageBody {
        MessageBody::new(text.to_string()).unwrap()
    }

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
    async fn test_submit_message_appends_then_returns_targets() {
        // テスト項目: メッセージが履歴に追記され、送信者以外が対象として返される
        // given (前提条件): alice, bob, charlie が参加中
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice", "bob", "charlie"]).await;
        let usecase = SubmitMessageUseCase::new(
            repository.clone(),
            history.clone(),
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(100)),
        );

        // when (操作): alice がメッセージを送信
        let alice = ConnectionId::new("alice".to_string());
        let result = usecase.execute(&room, &alice, body("Hello!")).await;

        // then (期待する結果):
        let (stored, targets) = result.unwrap();
        assert_eq!(stored.body.as_str(), "Hello!");
        assert_eq!(stored.sender.as_str(), "alice");
        assert_eq!(stored.timestamp.value(), 100);

        // alice 以外の 2 人がブロードキャスト対象
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&ConnectionId::new("bob".to_string())));
        assert!(targets.contains(&ConnectionId::new("charlie".to_string())));
        assert!(!targets.contains(&alice));

        // 履歴に追記されている
        let log = history.history(&room).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], stored);
    }

    #[tokio::test]
    async fn test_submit_message_no_broadcast_targets() {
        // テスト項目: 送信者のみが参加している場合、ブロードキャスト対象は空
        // given (前提条件): alice のみ参加
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice"]).await;
        let usecase = SubmitMessageUseCase::new(
            repository.clone(),
            history.clone(),
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(100)),
        );

        // when (操作):
        let alice = ConnectionId::new("alice".to_string());
        let result = usecase.execute(&room, &alice, body("Hello!")).await;

        // then (期待する結果):
        let (_stored, targets) = result.unwrap();
        assert_eq!(targets.len(), 0);

        // 履歴には追記されている
        assert_eq!(history.history(&room).await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_message_from_unknown_sender_fails_without_append() {
        // テスト項目: 参加していない接続からの送信はエラーになり、履歴は変化しない
        // given (前提条件): alice のみ参加
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice"]).await;
        let usecase = SubmitMessageUseCase::new(
            repository.clone(),
            history.clone(),
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(100)),
        );

        // when (操作): 未参加の接続から送信
        let stranger = ConnectionId::new("stranger".to_string());
        let result = usecase.execute(&room, &stranger, body("Hello!")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SubmitError::UnknownSender("lobby".to_string())));
        assert_eq!(history.history(&room).await.len(), 0);
    }

    #[tokio::test]
    async fn test_submit_message_never_echoes_to_sender() {
        // テスト項目: 送信者自身はブロードキャストを受け取らない（エコーバックなし）
        // given (前提条件): alice と bob が実チャンネル付きで参加中
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let room = RoomName::parse("lobby");
        setup_room_with_members(&repository, &room, &["alice", "bob"]).await;
        let (tx_alice, mut rx_alice) = mpsc::unbounded_channel();
        let (tx_bob, mut rx_bob) = mpsc::unbounded_channel();
        pusher
            .register_client(ConnectionId::new("alice".to_string()), tx_alice)
            .await;
        pusher
            .register_client(ConnectionId::new("bob".to_string()), tx_bob)
            .await;
        let usecase = SubmitMessageUseCase::new(
            repository.clone(),
            history.clone(),
            pusher,
            Arc::new(FixedClock::new(100)),
        );

        // when (操作): alice が送信し、対象へブロードキャスト
        let alice = ConnectionId::new("alice".to_string());
        let (_stored, targets) = usecase.execute(&room, &alice, body("hi")).await.unwrap();
        let outcomes = usecase.broadcast_message(targets, r#"{"message":"hi"}"#).await;

        // then (期待する結果): bob だけが受信し、alice には何も届かない
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
        assert_eq!(rx_bob.recv().await, Some(r#"{"message":"hi"}"#.to_string()));
        assert!(rx_alice.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_submit_message_is_isolated_per_room() {
        // テスト項目: ある Room への送信が別の Room の参加者に配送されない
        // given (前提条件): alice が alpha に、bob が beta に参加中
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let alpha = RoomName::parse("alpha");
        let beta = RoomName::parse("beta");
        setup_room_with_members(&repository, &alpha, &["alice"]).await;
        setup_room_with_members(&repository, &beta, &["bob"]).await;
        let usecase = SubmitMessageUseCase::new(
            repository.clone(),
            history.clone(),
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(100)),
        );

        // when (操作): alice が alpha に送信
        let alice = ConnectionId::new("alice".to_string());
        let (_stored, targets) = usecase.execute(&alpha, &alice, body("hi")).await.unwrap();

        // then (期待する結果): beta の bob は対象に含まれない
        assert!(targets.is_empty());
        assert_eq!(history.history(&alpha).await.len(), 1);
        assert_eq!(history.history(&beta).await.len(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_message_delegates_to_pusher() {
        // テスト項目: broadcast_message が MessagePusher に委譲される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let history = Arc::new(InMemoryHistoryStore::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, message| {
                *targets == [ConnectionId::new("bob".to_string())] && message == "payload"
            })
            .times(1)
            .returning(|targets, _| {
                targets
                    .into_iter()
                    .map(|target| PushOutcome {
                        target,
                        result: Ok(()),
                    })
                    .collect()
            });
        let usecase = SubmitMessageUseCase::new(
            repository,
            history,
            Arc::new(pusher),
            Arc::new(FixedClock::new(100)),
        );

        // when (操作):
        let outcomes = usecase
            .broadcast_message(vec![ConnectionId::new("bob".to_string())], "payload")
            .await;

        // then (期待する結果):
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
    }
}
