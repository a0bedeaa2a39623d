//! UseCase: Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加処理（Room の解決、接続 ID の発行、参加者登録）
//! - 参加通知の対象選定（新規参加者自身は含まれない）
//! - 新規参加者への履歴リプレイ
//!
//! ### なぜこのテストが必要か
//! - 参加の遷移順序（登録 → 参加通知 → リプレイ）はプロトコルの設計契約
//! - 参加通知が参加者自身に送られないことを保証
//! - リプレイが追記順（古い順）の完全な履歴であることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、2 人目以降の参加者
//! - エッジケース：履歴のある Room への参加（リプレイ内容の検証）

use std::sync::Arc;

use idobata_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionIdFactory, DisplayName, HistoryStore, Member,
    MessagePusher, PushOutcome, PusherChannel, RoomName, RoomRepository, Timestamp,
};

use super::error::JoinError;

/// Room への参加を表す Membership
///
/// 接続と Room の結び付き。接続の寿命の間、Room は変わらない。
#[derive(Debug, Clone)]
pub struct Membership {
    /// 参加先の Room
    pub room: RoomName,
    /// 発行された接続 ID
    pub connection_id: ConnectionId,
    /// 表示名（正規化済み）
    pub display_name: DisplayName,
    /// 参加時刻
    pub joined_at: Timestamp,
}

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（Room の解決と参加者集合の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// HistoryStore（メッセージ履歴の抽象化）
    history: Arc<dyn HistoryStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// Room への参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_name` - 参加先の Room 名（正規化済み）
    /// * `display_name` - 表示名（正規化済み）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Membership)` - 参加成功
    /// * `Err(JoinError)` - 参加失敗（Membership は確立されない）
    pub async fn execute(
        &self,
        room_name: RoomName,
        display_name: DisplayName,
        sender: PusherChannel,
    ) -> Result<Membership, JoinError> {
        // 1. Room を解決（存在しなければ作成）
        let now = Timestamp::new(self.clock.now_millis());
        self.repository.resolve_room(room_name.clone(), now).await;

        // 2. 接続 ID を発行し、参加者として登録
        let connection_id = ConnectionIdFactory::generate();
        let member = Member::new(connection_id.clone(), display_name.clone(), now);
        self.repository.add_member(&room_name, member).await?;

        // 3. MessagePusher に送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        Ok(Membership {
            room: room_name,
            connection_id,
            display_name,
            joined_at: now,
        })
    }

    /// 参加したことを既存の参加者にブロードキャスト
    ///
    /// 対象は新規参加者以外の全参加者。新規参加者自身には送られない。
    ///
    /// # Arguments
    ///
    /// * `membership` - 新規参加者の Membership
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_joined(
        &self,
        membership: &Membership,
        message: &str,
    ) -> Vec<PushOutcome> {
        let targets = self
            .get_peer_ids(&membership.room, &membership.connection_id)
            .await;
        self.message_pusher.broadcast(targets, message).await
    }

    /// 新規参加者へリプレイする履歴を取得（追記順・古い順）
    pub async fn replay_history(&self, room: &RoomName) -> Vec<ChatMessage> {
        self.history.history(room).await
    }

    /// 指定した接続以外の全参加者の接続 ID を取得
    async fn get_peer_ids(&self, room: &RoomName, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.repository
            .get_members(room)
            .await
            .into_iter()
            .filter(|m| &m.id != exclude)
            .map(|m| m.id)
            .collect()
    }
}
