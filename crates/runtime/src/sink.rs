//! Presentation sink that narrates the battle through `tracing`.
use tactics_core::{PresentationSink, TacticalEvent};

/// Forwards every committed event to the log at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn notify(&mut self, event: &TacticalEvent) {
        match event {
            TacticalEvent::Moved { unit, path } => {
                if let (Some(from), Some(to)) = (path.first(), path.last()) {
                    tracing::info!(%unit, %from, %to, steps = path.len().saturating_sub(1), "moved");
                }
            }
            TacticalEvent::Attacked {
                attacker,
                defender,
                target,
                damage,
            } => {
                tracing::info!(%attacker, %defender, %target, damage, "attacked");
            }
            TacticalEvent::Died { unit, position } => {
                tracing::info!(%unit, %position, "died");
            }
            TacticalEvent::Passed { unit } => {
                tracing::trace!(%unit, "passed");
            }
        }
    }
}
