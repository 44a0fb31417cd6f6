//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体。Repository と MessagePusher は trait object
//! として受け取り、具体的な実装には依存しない。

pub mod connect_client;
pub mod create_room;
pub mod disconnect_client;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod notify_error;
pub mod relay_message;

#[cfg(test)]
mod testing;

pub use connect_client::ConnectClientUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{CreateRoomError, JoinRoomError, RelayError};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use notify_error::NotifyErrorUseCase;
pub use relay_message::RelayMessageUseCase;
