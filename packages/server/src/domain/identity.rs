//! 接続 ID の発行
//!
//! join のたびに一意な不透明トークンを発行します。トークンは接続の寿命の間
//! 不変で、メッセージの帰属や参加者集合のキーとして使われます。

use uuid::Uuid;

use super::value_object::ConnectionId;

/// ConnectionId のファクトリ
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// 新しい一意な ConnectionId を発行
    pub fn generate() -> ConnectionId {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}
