//! Server state and connection management.

use std::sync::Arc;

use crate::usecase::{
    GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, SubmitMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SubmitMessageUseCase（メッセージ送信のユースケース）
    pub submit_message_usecase: Arc<SubmitMessageUseCase>,
    /// LeaveRoomUseCase（Room 退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
