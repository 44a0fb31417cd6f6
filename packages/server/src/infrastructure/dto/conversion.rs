//! Conversion logic between DTOs and domain models.

use syncwatch_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ErrorKind, Notification, PlaybackAction, PlaybackPosition, Room, VideoFileInfo,
};
use crate::infrastructure::dto::{
    http::{PlaybackDto, RoomDetailDto, RoomSummaryDto, VideoInfoDto},
    websocket::{ErrorKindDto, PlaybackActionDto, ServerMessage},
};

// ========================================
// DTO → Domain
// ========================================

impl From<PlaybackActionDto> for PlaybackAction {
    fn from(dto: PlaybackActionDto) -> Self {
        match dto {
            PlaybackActionDto::Play => PlaybackAction::Play,
            PlaybackActionDto::Pause => PlaybackAction::Pause,
            PlaybackActionDto::Seek => PlaybackAction::Seek,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<PlaybackAction> for PlaybackActionDto {
    fn from(model: PlaybackAction) -> Self {
        match model {
            PlaybackAction::Play => PlaybackActionDto::Play,
            PlaybackAction::Pause => PlaybackActionDto::Pause,
            PlaybackAction::Seek => PlaybackActionDto::Seek,
        }
    }
}

impl From<ErrorKind> for ErrorKindDto {
    fn from(model: ErrorKind) -> Self {
        match model {
            ErrorKind::RoomNotFound => ErrorKindDto::RoomNotFound,
            ErrorKind::NotAMember => ErrorKindDto::NotAMember,
            ErrorKind::InvalidPayload => ErrorKindDto::InvalidPayload,
            ErrorKind::Internal => ErrorKindDto::Internal,
        }
    }
}

impl From<&Notification> for ServerMessage {
    fn from(model: &Notification) -> Self {
        match model {
            Notification::RoomCreated { room_code } => ServerMessage::RoomCreated {
                room_code: room_code.as_str().to_string(),
            },
            Notification::RoomJoined { room_code } => ServerMessage::RoomJoined {
                room_code: room_code.as_str().to_string(),
            },
            Notification::UserJoined { connection_id } => ServerMessage::UserJoined {
                connection_id: connection_id.as_str().to_string(),
            },
            Notification::UserLeft { connection_id } => ServerMessage::UserLeft {
                connection_id: connection_id.as_str().to_string(),
            },
            Notification::HostVideoInfo { video } => ServerMessage::HostVideoInfo {
                name: video.name().to_string(),
                size: video.size(),
            },
            Notification::VideoAction {
                action,
                position,
                is_playing,
            } => ServerMessage::VideoAction {
                action: (*action).into(),
                time: position.seconds(),
                is_playing: *is_playing,
            },
            Notification::PlaybackState {
                position,
                is_playing,
            } => ServerMessage::PlaybackState {
                time: position.seconds(),
                is_playing: *is_playing,
            },
            Notification::Error { kind, message } => ServerMessage::Error {
                kind: (*kind).into(),
                message: message.clone(),
            },
        }
    }
}

impl From<&VideoFileInfo> for VideoInfoDto {
    fn from(model: &VideoFileInfo) -> Self {
        Self {
            name: model.name().to_string(),
            size: model.size(),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(model: &Room) -> Self {
        Self {
            code: model.code.as_str().to_string(),
            host: model.host.as_str().to_string(),
            members: model
                .sorted_members()
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

/// Build the room detail response.
///
/// `current_position` is the playback position extrapolated to the response time.
pub fn room_detail_dto(room: &Room, current_position: Option<PlaybackPosition>) -> RoomDetailDto {
    let playback = room.playback.as_ref().map(|snapshot| PlaybackDto {
        last_action: snapshot.action.into(),
        time: current_position.unwrap_or(snapshot.position).seconds(),
        is_playing: snapshot.is_playing,
    });

    RoomDetailDto {
        summary: room.into(),
        video: room.video.as_ref().map(VideoInfoDto::from),
        playback,
    }
}
