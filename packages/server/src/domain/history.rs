//! HistoryStore trait 定義
//!
//! Room ごとの追記専用メッセージログへのインターフェース。
//! 履歴は接続の入れ替わりとは独立に保持され、新規参加者へのリプレイに使われます。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError, RoomName};

/// Room ごとの追記専用メッセージログ
///
/// ## 順序の不変条件
///
/// - 1 つの Room のログは単一の全順序を持つ（追記順 = 到着順）
/// - タイムスタンプは Room 内で狭義単調増加：直前のメッセージ以下の
///   タイムスタンプで追記された場合、`last + 1` に調整される
/// - `history` は追記順（古い順）で返す
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// メッセージを Room の履歴へ追記し、保存されたメッセージを返す
    ///
    /// 返り値のタイムスタンプは調整済みの値。ブロードキャストには
    /// この返り値を使うこと（ログに無いメッセージが配送されないように）。
    async fn append(
        &self,
        room: &RoomName,
        message: ChatMessage,
    ) -> Result<ChatMessage, RepositoryError>;

    /// Room の全履歴を追記順（古い順）で取得
    async fn history(&self, room: &RoomName) -> Vec<ChatMessage>;
}
