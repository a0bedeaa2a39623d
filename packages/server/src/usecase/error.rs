//! UseCase 層のエラー型定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// 参加処理のエラー
///
/// 参加の失敗は呼び出し側（UI 層）に伝播し、Membership は確立されない。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JoinError {
    /// Room への参加者登録に失敗した
    #[error("room is unavailable: {0}")]
    RoomUnavailable(#[from] RepositoryError),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    /// 送信者が Room の参加者ではない
    #[error("sender is not a member of room '{0}'")]
    UnknownSender(String),

    /// 履歴への追記に失敗した
    #[error("failed to append message: {0}")]
    AppendFailed(#[from] RepositoryError),
}

/// Room 詳細取得のエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GetRoomDetailError {
    /// 指定された Room が存在しない
    #[error("room not found")]
    RoomNotFound,
}
