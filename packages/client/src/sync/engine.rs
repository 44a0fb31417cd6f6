//! Playback synchronization state machine.
//!
//! The engine sits between one video element and the relay. It decides which
//! element notifications are user actions worth forwarding, rate-limits what
//! it forwards, and turns incoming remote events into element commands.
//!
//! ```text
//!            load()                 on_remote() applied
//!   Idle ───────────────▶ Local ─────────────────────▶ Reconciling
//!                           ▲                              │
//!                           └──── settle(ticket) / deadline ┘
//! ```
//!
//! While `Reconciling`, element notifications are treated as the echo of the
//! commands the engine just issued and are never forwarded.

use std::time::Duration;

use syncwatch_shared::time::Clock;

/// Timing and tolerance settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    /// Minimum time between two sync events sent or applied
    pub min_sync_interval: Duration,
    /// Position difference (seconds) tolerated before a corrective seek
    pub drift_tolerance_secs: f64,
    /// How long element notifications are treated as echo after applying a remote event
    pub settle_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            min_sync_interval: Duration::from_millis(1000),
            drift_tolerance_secs: 0.5,
            settle_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Play,
    Pause,
    Seek,
}

/// A playback transition exchanged with the other members of a room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncEvent {
    pub action: SyncAction,
    /// Playback position in seconds
    pub time: f64,
    /// For seeks: whether playback was active right before the seek
    pub is_playing: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEventKind {
    Play,
    Pause,
    Seeked,
}

/// Notification fired by the video element after its state changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementEvent {
    pub kind: ElementEventKind,
    pub position: f64,
}

/// Command the engine wants applied to the video element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementCommand {
    Seek(f64),
    Play,
    Pause,
}

/// What the element looks like right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPlayback {
    pub position: f64,
    pub paused: bool,
}

/// Identifies one scheduled settle transition. Only the newest ticket settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleTicket(u64);

/// Commands to apply for one remote event, plus the settle transition to schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub commands: Vec<ElementCommand>,
    pub settle: SettleTicket,
    pub settle_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Arrived within the minimum interval of the previous sync
    RateLimited,
    /// Time was NaN or infinite
    NonFiniteTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Apply(ReconcilePlan),
    Dropped(DropReason),
    /// No video loaded yet; kept and applied on `load`
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalOutcome {
    /// Forward this event to the room
    Emit(SyncEvent),
    /// Within the minimum interval; the element changed but nothing is sent
    RateLimited,
    /// Echo of a remote command being applied
    Suppressed,
    /// No video loaded
    Ignored,
}

/// Coarse state, for display and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Local,
    Reconciling,
}

#[derive(Debug, Clone, PartialEq)]
enum EngineState {
    Idle {
        pending: Option<PendingEvent>,
    },
    Local,
    Reconciling {
        ticket: SettleTicket,
        until_millis: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingEvent {
    event: SyncEvent,
    received_at_millis: u64,
}

impl PendingEvent {
    /// The event with its time moved forward by however long playback has been running
    fn extrapolated(&self, now_millis: u64) -> SyncEvent {
        let playing = match self.event.action {
            SyncAction::Play => true,
            SyncAction::Pause => false,
            SyncAction::Seek => self.event.is_playing.unwrap_or(false),
        };
        if !playing {
            return self.event;
        }
        let elapsed = now_millis.saturating_sub(self.received_at_millis) as f64 / 1000.0;
        SyncEvent {
            time: self.event.time + elapsed,
            ..self.event
        }
    }
}

pub struct SyncEngine<C: Clock> {
    clock: C,
    config: SyncConfig,
    state: EngineState,
    last_sync_millis: Option<u64>,
    playing: bool,
    duration: Option<f64>,
    next_ticket: u64,
}

impl<C: Clock> SyncEngine<C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, SyncConfig::default())
    }

    pub fn with_config(clock: C, config: SyncConfig) -> Self {
        Self {
            clock,
            config,
            state: EngineState::Idle { pending: None },
            last_sync_millis: None,
            playing: false,
            duration: None,
            next_ticket: 0,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        match self.state {
            EngineState::Idle { .. } => SyncPhase::Idle,
            EngineState::Local => SyncPhase::Local,
            EngineState::Reconciling { .. } => SyncPhase::Reconciling,
        }
    }

    /// Playing flag as last known by this engine
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn last_sync_millis(&self) -> Option<u64> {
        self.last_sync_millis
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// A video was loaded into the element.
    ///
    /// If a remote event arrived while no video was loaded, it is applied now
    /// and the resulting plan is returned.
    pub fn load(&mut self, duration: Option<f64>, local: LocalPlayback) -> Option<ReconcilePlan> {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self.playing = !local.paused;

        let pending = match std::mem::replace(&mut self.state, EngineState::Local) {
            EngineState::Idle { pending } => pending,
            _ => None,
        };

        let now = self.clock.now_millis();
        pending.map(|pending| {
            tracing::debug!("Applying event received before load: {:?}", pending.event);
            self.apply(pending.extrapolated(now), local, now)
        })
    }

    /// An element notification fired.
    pub fn on_element_event(&mut self, event: ElementEvent) -> LocalOutcome {
        let now = self.clock.now_millis();
        self.settle_if_due(now);

        match self.state {
            EngineState::Idle { .. } => return LocalOutcome::Ignored,
            EngineState::Reconciling { .. } => {
                tracing::trace!("Suppressed echo: {:?}", event);
                return LocalOutcome::Suppressed;
            }
            EngineState::Local => {}
        }

        let was_playing = self.playing;
        match event.kind {
            ElementEventKind::Play => self.playing = true,
            ElementEventKind::Pause => self.playing = false,
            ElementEventKind::Seeked => {}
        }

        if !self.interval_elapsed(now) {
            tracing::debug!("Local {:?} not forwarded (rate limited)", event.kind);
            return LocalOutcome::RateLimited;
        }
        self.last_sync_millis = Some(now);

        let (action, is_playing) = match event.kind {
            ElementEventKind::Play => (SyncAction::Play, None),
            ElementEventKind::Pause => (SyncAction::Pause, None),
            ElementEventKind::Seeked => (SyncAction::Seek, Some(was_playing)),
        };
        LocalOutcome::Emit(SyncEvent {
            action,
            time: self.clamp(event.position.max(0.0)),
            is_playing,
        })
    }

    /// A sync event arrived from another member.
    pub fn on_remote(&mut self, event: SyncEvent, local: LocalPlayback) -> RemoteOutcome {
        if !event.time.is_finite() {
            return RemoteOutcome::Dropped(DropReason::NonFiniteTime);
        }

        let now = self.clock.now_millis();
        if let EngineState::Idle { pending } = &mut self.state {
            *pending = Some(PendingEvent {
                event,
                received_at_millis: now,
            });
            return RemoteOutcome::Deferred;
        }

        self.settle_if_due(now);
        if !self.interval_elapsed(now) {
            tracing::debug!("Remote {:?} dropped (rate limited)", event.action);
            return RemoteOutcome::Dropped(DropReason::RateLimited);
        }

        RemoteOutcome::Apply(self.apply(event, local, now))
    }

    /// Scheduled settle transition. Returns `false` for a stale ticket.
    pub fn settle(&mut self, ticket: SettleTicket) -> bool {
        match self.state {
            EngineState::Reconciling { ticket: current, .. } if current == ticket => {
                self.state = EngineState::Local;
                true
            }
            _ => false,
        }
    }

    fn apply(&mut self, event: SyncEvent, local: LocalPlayback, now: u64) -> ReconcilePlan {
        let target = self.clamp(event.time);
        let drifted = (local.position - target).abs() > self.config.drift_tolerance_secs;

        let mut commands = Vec::with_capacity(2);
        if drifted {
            commands.push(ElementCommand::Seek(target));
        }

        let want_playing = match event.action {
            SyncAction::Play => Some(true),
            SyncAction::Pause => Some(false),
            SyncAction::Seek => event.is_playing,
        };
        if let Some(want_playing) = want_playing {
            if want_playing && local.paused {
                commands.push(ElementCommand::Play);
            } else if !want_playing && !local.paused {
                commands.push(ElementCommand::Pause);
            }
            self.playing = want_playing;
        }

        self.last_sync_millis = Some(now);
        let ticket = SettleTicket(self.next_ticket);
        self.next_ticket += 1;
        self.state = EngineState::Reconciling {
            ticket,
            until_millis: now + self.config.settle_delay.as_millis() as u64,
        };

        ReconcilePlan {
            commands,
            settle: ticket,
            settle_after: self.config.settle_delay,
        }
    }

    fn settle_if_due(&mut self, now: u64) {
        if let EngineState::Reconciling { until_millis, .. } = self.state
            && now >= until_millis
        {
            self.state = EngineState::Local;
        }
    }

    fn interval_elapsed(&self, now: u64) -> bool {
        let min = self.config.min_sync_interval.as_millis() as u64;
        self.last_sync_millis
            .is_none_or(|last| now.saturating_sub(last) >= min)
    }

    fn clamp(&self, time: f64) -> f64 {
        let time = time.max(0.0);
        match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        }
    }
}
