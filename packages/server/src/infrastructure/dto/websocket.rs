//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`. Variant and field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Playback transition on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackActionDto {
    Play,
    Pause,
    Seek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKindDto {
    RoomNotFound,
    NotAMember,
    InvalidPayload,
    Internal,
}

/// Client → relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom {
        room_code: String,
    },
    HostVideoInfo {
        room_code: String,
        name: String,
        size: u64,
    },
    VideoAction {
        room_code: String,
        action: PlaybackActionDto,
        time: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_playing: Option<bool>,
    },
}

/// Relay → client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    RoomCreated {
        room_code: String,
    },
    RoomJoined {
        room_code: String,
    },
    UserJoined {
        connection_id: String,
    },
    UserLeft {
        connection_id: String,
    },
    HostVideoInfo {
        name: String,
        size: u64,
    },
    VideoAction {
        action: PlaybackActionDto,
        time: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_playing: Option<bool>,
    },
    PlaybackState {
        time: f64,
        is_playing: bool,
    },
    Error {
        kind: ErrorKindDto,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_messages_parse_from_wire_json() {
        // テスト項目: クライアントが送る JSON をパースできる
        // given (前提条件):
        let create = r#"{"type":"createRoom"}"#;
        let join = r#"{"type":"joinRoom","roomCode":"AB12CD"}"#;
        let info = r#"{"type":"hostVideoInfo","roomCode":"AB12CD","name":"movie.mp4","size":50000000}"#;
        let seek = r#"{"type":"videoAction","roomCode":"AB12CD","action":"seek","time":42.5,"isPlaying":true}"#;

        // when (操作):
        let parsed: Vec<ClientMessage> = [create, join, info, seek]
            .iter()
            .map(|s| serde_json::from_str(s).unwrap())
            .collect();

        // then (期待する結果):
        assert_eq!(parsed[0], ClientMessage::CreateRoom);
        assert_eq!(
            parsed[1],
            ClientMessage::JoinRoom {
                room_code: "AB12CD".to_string()
            }
        );
        assert_eq!(
            parsed[2],
            ClientMessage::HostVideoInfo {
                room_code: "AB12CD".to_string(),
                name: "movie.mp4".to_string(),
                size: 50_000_000,
            }
        );
        assert_eq!(
            parsed[3],
            ClientMessage::VideoAction {
                room_code: "AB12CD".to_string(),
                action: PlaybackActionDto::Seek,
                time: 42.5,
                is_playing: Some(true),
            }
        );
    }

    #[test]
    fn test_video_action_without_is_playing() {
        // テスト項目: isPlaying は省略可能で、省略時は出力にも含まれない
        // given (前提条件):
        let raw = r#"{"type":"videoAction","roomCode":"AB12CD","action":"play","time":3.2}"#;

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();
        let forwarded = ServerMessage::VideoAction {
            action: PlaybackActionDto::Play,
            time: 3.2,
            is_playing: None,
        };

        // then (期待する結果):
        assert!(matches!(
            parsed,
            ClientMessage::VideoAction {
                is_playing: None,
                ..
            }
        ));
        assert_eq!(
            serde_json::to_value(&forwarded).unwrap(),
            json!({"type": "videoAction", "action": "play", "time": 3.2})
        );
    }

    #[test]
    fn test_server_message_wire_shape() {
        // テスト項目: サーバーが送る JSON のフィールド名が camelCase
        // given (前提条件):
        let joined = ServerMessage::UserJoined {
            connection_id: "abc".to_string(),
        };
        let state = ServerMessage::PlaybackState {
            time: 10.0,
            is_playing: true,
        };
        let error = ServerMessage::Error {
            kind: ErrorKindDto::NotAMember,
            message: "nope".to_string(),
        };

        // when (操作):
        let values: Vec<serde_json::Value> = [joined, state, error]
            .iter()
            .map(|m| serde_json::to_value(m).unwrap())
            .collect();

        // then (期待する結果):
        assert_eq!(
            values[0],
            json!({"type": "userJoined", "connectionId": "abc"})
        );
        assert_eq!(
            values[1],
            json!({"type": "playbackState", "time": 10.0, "isPlaying": true})
        );
        assert_eq!(
            values[2],
            json!({"type": "error", "kind": "notAMember", "message": "nope"})
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        // テスト項目: 未知の action はパースエラーになる
        // given (前提条件):
        let raw = r#"{"type":"videoAction","roomCode":"AB12CD","action":"rewind","time":1.0}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
