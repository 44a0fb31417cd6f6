//! Shared application state.

use std::sync::Arc;

use syncwatch_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, NotifyErrorUseCase, RelayMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続受付のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RelayMessageUseCase（中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// NotifyErrorUseCase（エラー通知のユースケース）
    pub notify_error_usecase: Arc<NotifyErrorUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire every use case to the given repository, pusher and clock.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            relay_message_usecase: Arc::new(RelayMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            notify_error_usecase: Arc::new(NotifyErrorUseCase::new(message_pusher)),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository, clock)),
        }
    }
}
