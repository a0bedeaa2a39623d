//! ドメイン層
//!
//! Room、Member、ChatMessage のドメインモデルと、
//! Infrastructure 層が実装するインターフェース（Repository / HistoryStore / MessagePusher）を定義します。

mod entity;
mod error;
mod history;
mod identity;
mod pusher;
mod repository;
mod value_object;

pub use entity::{ChatMessage, Member, Room};
pub use error::{MessagePushError, RepositoryError, ValidationError};
pub use history::HistoryStore;
pub use identity::ConnectionIdFactory;
pub use pusher::{MessagePusher, PushOutcome, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, DisplayName, MessageBody, RoomName, Timestamp};

#[cfg(test)]
pub use pusher::MockMessagePusher;
