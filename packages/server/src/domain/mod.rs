//! ドメイン層
//!
//! - `value_object`: ConnectionId, RoomCode などの値オブジェクト
//! - `entity`: Room エンティティ
//! - `factory`: RoomCode の生成
//! - `notification`: 接続へ送る通知
//! - `repository` / `message_pusher`: Infrastructure 層が実装するインターフェース

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{PlaybackSnapshot, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::RoomCodeFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::{ErrorKind, Notification};
pub use repository::{Departure, JoinOutcome, RoomRepository};
pub use value_object::{
    ConnectionId, PlaybackAction, PlaybackPosition, RoomCode, Timestamp, VideoFileInfo,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
