//! ドメイン層のエラー型定義

use thiserror::Error;

/// Repository 操作のエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// 指定された Room が存在しない
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessagePushError {
    /// 宛先の接続が登録されていない
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    /// 送信チャンネルへの書き込みに失敗した
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// 本文が空（空白のみを含む）
    #[error("message body is empty")]
    EmptyMessageBody,

    /// 本文が最大文字数を超えている
    #[error("message body is too long ({0} chars)")]
    MessageBodyTooLong(usize),
}
