//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値がドメインに入り込まないようにします。

use std::fmt;

use super::error::ValueObjectError;

/// ConnectionId の最大長
pub const CONNECTION_ID_MAX_LEN: usize = 64;
/// RoomCode の最小長
pub const ROOM_CODE_MIN_LEN: usize = 4;
/// RoomCode の最大長
pub const ROOM_CODE_MAX_LEN: usize = 12;
/// 動画ファイル名の最大長（文字数）
pub const VIDEO_NAME_MAX_LEN: usize = 255;

/// 接続 ID
///
/// 1 本の WebSocket 接続を識別する不透明な ID。再接続すると別の ID になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// 既存の文字列から ConnectionId を作成
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        if value.len() > CONNECTION_ID_MAX_LEN {
            return Err(ValueObjectError::ConnectionIdTooLong {
                max: CONNECTION_ID_MAX_LEN,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// 新しい接続用の ID を発行（UUID v4）
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームコード
///
/// 人が読み上げて共有できる短い英大文字・数字の列。
/// 入力は前後の空白を除去して大文字に正規化してから検証する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let normalized = value.trim().to_ascii_uppercase();
        let len = normalized.chars().count();
        if !(ROOM_CODE_MIN_LEN..=ROOM_CODE_MAX_LEN).contains(&len) {
            return Err(ValueObjectError::RoomCodeLength {
                min: ROOM_CODE_MIN_LEN,
                max: ROOM_CODE_MAX_LEN,
                actual: len,
            });
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValueObjectError::RoomCodeCharset(normalized));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 再生位置（秒）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PlaybackPosition(f64);

impl PlaybackPosition {
    pub fn new(seconds: f64) -> Result<Self, ValueObjectError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ValueObjectError::InvalidPlaybackPosition(seconds));
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    /// 指定ミリ秒だけ再生が進んだ位置
    pub fn advanced_by_millis(&self, millis: u64) -> Self {
        Self(self.0 + millis as f64 / 1000.0)
    }
}

/// 再生操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackAction {
    Play,
    Pause,
    Seek,
}

impl PlaybackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackAction::Play => "play",
            PlaybackAction::Pause => "pause",
            PlaybackAction::Seek => "seek",
        }
    }
}

impl TryFrom<&str> for PlaybackAction {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "play" => Ok(PlaybackAction::Play),
            "pause" => Ok(PlaybackAction::Pause),
            "seek" => Ok(PlaybackAction::Seek),
            other => Err(ValueObjectError::UnknownPlaybackAction(other.to_string())),
        }
    }
}

impl fmt::Display for PlaybackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ホストが読み込んだ動画ファイルのメタデータ（中身は扱わない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFileInfo {
    name: String,
    size: u64,
}

impl VideoFileInfo {
    pub fn new(name: String, size: u64) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::VideoNameEmpty);
        }
        let len = name.chars().count();
        if len > VIDEO_NAME_MAX_LEN {
            return Err(ValueObjectError::VideoNameTooLong {
                max: VIDEO_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self { name, size })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
