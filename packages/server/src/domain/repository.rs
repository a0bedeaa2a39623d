//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, Member, RepositoryError, Room, RoomName, Timestamp};

/// Room Repository trait
///
/// Room の解決（Room Directory）と参加者集合の管理を担うインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## Room の解決
///
/// - `resolve_room` は get-or-create：同名に対して常に同一の論理 Room を返す
/// - 同名の並行した初回解決で Room が二重に作られてはならない（single-writer-per-name）
/// - Room の寿命は初回解決からプロセス終了まで（明示的な削除はない）
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を名前で解決する（存在しなければ `now` を作成時刻として作成する）
    async fn resolve_room(&self, name: RoomName, now: Timestamp) -> Room;

    /// Room を名前で検索する（作成はしない）
    async fn find_room(&self, name: &RoomName) -> Option<Room>;

    /// 参加者を Room に追加
    async fn add_member(&self, room: &RoomName, member: Member) -> Result<(), RepositoryError>;

    /// 参加者を Room から削除し、削除した Member を返す
    ///
    /// 参加者が見つからない場合は None（削除は常に成功扱い）
    async fn remove_member(&self, room: &RoomName, id: &ConnectionId) -> Option<Member>;

    /// Room の現在の参加者リストを取得
    async fn get_members(&self, room: &RoomName) -> Vec<Member>;

    /// これまでに解決された全ての Room を取得
    async fn list_rooms(&self) -> Vec<Room>;
}
