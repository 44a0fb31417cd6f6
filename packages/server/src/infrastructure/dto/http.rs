//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PlaybackActionDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub code: String,
    pub host: String,
    pub members: Vec<String>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfoDto {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackDto {
    pub last_action: PlaybackActionDto,
    /// Estimated position at response time
    pub time: f64,
    pub is_playing: bool,
}

/// Response of `GET /api/rooms/{code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    #[serde(flatten)]
    pub summary: RoomSummaryDto,
    pub video: Option<VideoInfoDto>,
    pub playback: Option<PlaybackDto>,
}
