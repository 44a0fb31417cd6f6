//! UseCase: ルーム詳細の取得

use std::sync::Arc;

use syncwatch_shared::time::Clock;

use crate::domain::{PlaybackPosition, Room, RoomCode, RoomRepository};

/// ルーム詳細
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: Room,
    /// 現在時刻まで推定した再生位置（再生操作が一度もなければ `None`）
    pub current_position: Option<PlaybackPosition>,
}

pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn execute(&self, room_code: &RoomCode) -> Option<RoomDetail> {
        let room = self.repository.get_room(room_code).await?;
        let now = self.clock.now_millis();
        let current_position = room
            .playback
            .as_ref()
            .map(|snapshot| snapshot.position_at(now));
        Some(RoomDetail {
            room,
            current_position,
        })
    }
}
