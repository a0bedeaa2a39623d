//! 値オブジェクト定義
//!
//! 入力文字列の正規化・バリデーションはすべてここで行います。
//! UseCase 層・UI 層は生の String ではなく値オブジェクトを受け渡しします。

use std::fmt;

use serde::Serialize;

use super::error::ValidationError;

/// Room 名（文字列キー）
///
/// 前後の空白は除去され、空文字・空白のみの入力は既定の Room `"default"` に
/// 正規化されます。正規化済みの値しか存在しないため生成は失敗しません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// 既定の Room 名
    pub const DEFAULT: &'static str = "default";

    /// 入力文字列から RoomName を生成（空なら `"default"`）
    pub fn parse(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参加者の表示名
///
/// 前後の空白は除去され、空文字・空白のみの入力は `"Anonymous"` になります。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// 表示名が無い場合の既定値
    pub const ANONYMOUS: &'static str = "Anonymous";

    /// 入力文字列から DisplayName を生成（空なら `"Anonymous"`）
    pub fn parse(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 接続を識別する不透明なトークン
///
/// join 時に `ConnectionIdFactory` が発行し、接続が生きている間は不変です。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// メッセージ本文
///
/// 前後の空白を除去した上で、空文字と 256 文字超えを拒否します。
/// 不正な本文は送信者へ通知されずに破棄される仕様のため、
/// このバリデーション結果がユーザーに見えることはありません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageBody(String);

impl MessageBody {
    /// メッセージ本文の最大文字数
    pub const MAX_CHARS: usize = 256;

    /// 入力文字列から MessageBody を生成
    pub fn new(raw: String) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMessageBody);
        }
        let chars = trimmed.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::MessageBodyTooLong(chars));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 1 ミリ秒後のタイムスタンプ
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}
