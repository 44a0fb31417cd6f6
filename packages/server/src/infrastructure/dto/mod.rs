//! Data Transfer Objects (DTOs) for syncwatch.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (shared with the client crate)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
