//! UseCase 層
//!
//! Room への参加・メッセージ送信・退出・照会のアプリケーションロジック。
//! ドメイン層の trait（Repository / HistoryStore / MessagePusher）にのみ依存し、
//! Infrastructure 層の具体的な実装には依存しません。

mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod submit_message;

pub use error::{GetRoomDetailError, JoinError, SubmitError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomUseCase, Membership};
pub use leave_room::LeaveRoomUseCase;
pub use submit_message::SubmitMessageUseCase;
