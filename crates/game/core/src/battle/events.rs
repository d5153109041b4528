//! Notifications emitted for the presentation layer.
use crate::state::{Position, UnitId};

/// Committed battlefield change, published after the state has been updated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TacticalEvent {
    /// A unit walked `path`, origin first.
    Moved { unit: UnitId, path: Vec<Position> },
    Attacked {
        attacker: UnitId,
        defender: UnitId,
        target: Position,
        damage: u32,
    },
    Died { unit: UnitId, position: Position },
    /// A unit gave up whatever budget it had left this turn.
    Passed { unit: UnitId },
}

/// Fire-and-forget consumer of [`TacticalEvent`]s (animation, audio, logs).
///
/// The core never waits on a sink and never reads anything back from it.
pub trait PresentationSink {
    fn notify(&mut self, event: &TacticalEvent);
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn notify(&mut self, _event: &TacticalEvent) {}
}

/// Sink that keeps every event in order; handy for replays and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<TacticalEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TacticalEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<TacticalEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn moves(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TacticalEvent::Moved { .. }))
            .count()
    }

    pub fn attacks(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TacticalEvent::Attacked { .. }))
            .count()
    }
}

impl PresentationSink for RecordingSink {
    fn notify(&mut self, event: &TacticalEvent) {
        self.events.push(event.clone());
    }
}
