//! syncwatch client.
//!
//! The playback sync engine, a simulated video element for it to drive, and
//! an interactive terminal client that connects both to a relay.

pub mod command;
pub mod controller;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod sync;
mod ui;

pub use runner::run_client;
