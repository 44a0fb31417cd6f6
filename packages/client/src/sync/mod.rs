//! Playback synchronization: the engine and the element it drives.

pub mod engine;
pub mod player;

pub use engine::{
    DropReason, ElementCommand, ElementEvent, ElementEventKind, LocalOutcome, LocalPlayback,
    ReconcilePlan, RemoteOutcome, SettleTicket, SyncAction, SyncConfig, SyncEngine, SyncEvent,
    SyncPhase,
};
pub use player::{SimulatedPlayer, VideoElement};
