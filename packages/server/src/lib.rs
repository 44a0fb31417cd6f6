//! syncwatch relay server.
//!
//! Keeps a registry of viewing rooms and relays playback control messages
//! (play/pause/seek and host file metadata) between the members of a room.
//! Video bytes never pass through the relay.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
