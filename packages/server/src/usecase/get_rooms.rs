//! UseCase: ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ルーム（コード順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, Timestamp},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_get_rooms_sorted_by_code() {
        // テスト項目: ルーム一覧がコード順で返る
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        for name in ["a", "b", "c"] {
            repository
                .create_room(ConnectionId::new(name.to_string()).unwrap(), Timestamp::new(0))
                .await
                .unwrap();
        }
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 3);
        assert!(rooms.windows(2).all(|w| w[0].code < w[1].code));
    }
}
