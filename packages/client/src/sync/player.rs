//! Video element abstraction and a clock-driven simulation of it.

use std::collections::VecDeque;

use syncwatch_shared::time::Clock;

use super::engine::{ElementCommand, ElementEvent, ElementEventKind, LocalPlayback};

/// The playback surface the sync engine drives.
///
/// Mutations are asynchronous in spirit: they change state immediately but
/// the matching notification is only observed when the caller drains
/// [`VideoElement::take_events`], the same way a browser fires `play`, `pause`
/// and `seeked` after the fact.
pub trait VideoElement {
    /// Current position in seconds
    fn position(&self) -> f64;
    fn is_paused(&self) -> bool;
    /// Media duration, if known
    fn duration(&self) -> Option<f64>;

    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);

    /// Drain notifications fired since the last call, oldest first
    fn take_events(&mut self) -> Vec<ElementEvent>;

    fn snapshot(&self) -> LocalPlayback {
        LocalPlayback {
            position: self.position(),
            paused: self.is_paused(),
        }
    }

    fn apply(&mut self, commands: &[ElementCommand]) {
        for command in commands {
            match *command {
                ElementCommand::Seek(position) => self.seek(position),
                ElementCommand::Play => self.play(),
                ElementCommand::Pause => self.pause(),
            }
        }
    }
}

/// In-memory player whose position advances with the injected clock.
pub struct SimulatedPlayer<C: Clock> {
    clock: C,
    duration: Option<f64>,
    /// Position at `anchor_millis`
    anchor_position: f64,
    anchor_millis: u64,
    paused: bool,
    events: VecDeque<ElementEvent>,
}

impl<C: Clock> SimulatedPlayer<C> {
    pub fn new(clock: C) -> Self {
        let now = clock.now_millis();
        Self {
            clock,
            duration: None,
            anchor_position: 0.0,
            anchor_millis: now,
            paused: true,
            events: VecDeque::new(),
        }
    }

    /// Load new media: position 0, paused. Loading fires no play/pause/seeked.
    pub fn load(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self.anchor_position = 0.0;
        self.anchor_millis = self.clock.now_millis();
        self.paused = true;
        self.events.clear();
    }

    fn reanchor(&mut self) {
        self.anchor_position = self.position();
        self.anchor_millis = self.clock.now_millis();
    }

    fn clamp(&self, position: f64) -> f64 {
        let position = position.max(0.0);
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn fire(&mut self, kind: ElementEventKind) {
        let position = self.position();
        self.events.push_back(ElementEvent { kind, position });
    }
}

impl<C: Clock> VideoElement for SimulatedPlayer<C> {
    fn position(&self) -> f64 {
        if self.paused {
            return self.anchor_position;
        }
        let elapsed = self.clock.now_millis().saturating_sub(self.anchor_millis) as f64 / 1000.0;
        self.clamp(self.anchor_position + elapsed)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        self.reanchor();
        self.paused = false;
        self.fire(ElementEventKind::Play);
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.reanchor();
        self.paused = true;
        self.fire(ElementEventKind::Pause);
    }

    fn seek(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        self.anchor_position = self.clamp(position);
        self.anchor_millis = self.clock.now_millis();
        self.fire(ElementEventKind::Seeked);
    }

    fn take_events(&mut self) -> Vec<ElementEvent> {
        self.events.drain(..).collect()
    }
}
