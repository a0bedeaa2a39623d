//! WebSocket のワイヤ形式
//!
//! ライブ配信・履歴リプレイ・参加/退出通知はすべて同じ 1 つの JSON 形式を使います：
//!
//! ```json
//! { "message": "<本文>", "name": "<表示名>", "timestamp": 1690000000000 }
//! ```
//!
//! `timestamp` は省略可能。参加/退出の通知は `message` を固定フレーズにし、
//! タイムスタンプ無しで送られます（履歴には残らない）。
//!
//! クライアントからの送信は `{ "message": "<本文>" }` のみ。表示名と
//! タイムスタンプはサーバーが付与します。

use serde::{Deserialize, Serialize};

use crate::domain::MessageBody;

/// 参加通知の固定フレーズ
pub const JOINED_NOTICE: &str = "joined the chat";

/// 退出通知の固定フレーズ
pub const LEFT_NOTICE: &str = "Disconnected";

/// ライブ配信・リプレイ・通知に共通のワイヤ形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// 本文（通知の場合は固定フレーズ）
    pub message: String,
    /// 送信者（通知の場合は対象者）の表示名
    pub name: String,
    /// サーバーが割り当てたタイムスタンプ（通知には付かない）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl WireMessage {
    /// 参加通知を作成
    pub fn joined_notice(name: &str) -> Self {
        Self {
            message: JOINED_NOTICE.to_string(),
            name: name.to_string(),
            timestamp: None,
        }
    }

    /// 退出通知を作成
    pub fn left_notice(name: &str) -> Self {
        Self {
            message: LEFT_NOTICE.to_string(),
            name: name.to_string(),
            timestamp: None,
        }
    }
}

/// クライアントからの送信ペイロード（クライアント側の組み立て用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub message: String,
}

/// 受信したテキストフレームをメッセージ本文として解釈する
///
/// 次のいずれかに該当する場合は None（呼び出し側は黙って破棄する）：
/// - JSON オブジェクトとしてパースできない
/// - `message` フィールドが無い、または文字列でない
/// - 空白を除去した本文が空、または長すぎる
///
/// 受信側のバリデーションは意図的に寛容で、不正な入力はエラーではなく
/// ノイズとして扱います。
pub fn parse_submission(raw: &str) -> Option<MessageBody> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let message = value.get("message")?.as_str()?;
    MessageBody::new(message.to_string()).ok()
}
