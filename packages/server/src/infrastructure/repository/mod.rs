//! Repository の実装
//!
//! - `inmemory`: プロセス内メモリに保持する実装（永続化なし）

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
