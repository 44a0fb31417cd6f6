//! Utilities shared by the syncwatch server and client.

pub mod logger;
pub mod time;
