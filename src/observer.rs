//! Transition-event observer capability
//!
//! The tick orchestrator reports state-machine transitions through this
//! trait instead of writing to module-level logging state. A no-op observer
//! is a valid implementation; nothing in the engine depends on events being
//! seen.

use serde::Serialize;

/// A notable transition inside the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SessionEvent {
    /// The intro resolved and the session entered `Running`
    Started,
    /// Pause toggled; `paused` is the new state
    PauseToggled { paused: bool },
    /// A teleport resolved successfully
    Teleported { from_x: i32, to_x: i32 },
    /// A teleport was requested with an empty target interval (no-op)
    TeleportRejected { x: i32 },
    /// An obstacle occupied the avatar's cell
    Collision { x: i32, y: i32 },
    /// The avatar died (follows `Collision` in the same tick)
    Death { x: i32, y: i32 },
    /// Terminal transition; `aborted` means the intro was cancelled before
    /// the session ever ran
    Ended { final_score: i64, aborted: bool },
}

/// Capability the controller calls at defined transition points
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent);
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_event(&mut self, _event: &SessionEvent) {}
}

/// Observer that forwards events to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_event(&mut self, event: &SessionEvent) {
        log::debug!("session event: {event:?}");
    }
}
