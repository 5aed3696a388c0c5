//! Rockfall - a falling-rock dodging arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, field rules, scoring, the tick state machine)
//! - `frame`: Render-ready frame descriptor handed to an external display sink
//! - `observer`: Transition-event capability for external observability
//!
//! Rendering, raw key decoding, and screen presentation are external
//! collaborators: callers feed decoded [`sim::Intent`]s and a monotonic clock
//! reading into [`sim::tick`] and draw whatever the returned [`frame::Frame`]
//! describes.

pub mod frame;
pub mod observer;
pub mod sim;

pub use frame::Frame;
pub use observer::{NoopObserver, SessionEvent, SessionObserver};
pub use sim::{Intent, Session, SessionPhase, SimError, tick};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Nominal tick cadence (~50ms, about 20 ticks per second)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

    /// A new obstacle wave spawns every this many ticks
    pub const SPAWN_INTERVAL_TICKS: u64 = 20;
    /// Obstacles advance one row every this many ticks (half the tick rate)
    pub const FALL_INTERVAL_TICKS: u64 = 2;
    /// The wave size grows by one every this many ticks (every 5th wave)
    pub const WAVE_GROWTH_INTERVAL_TICKS: u64 = 100;

    /// Spawn rows are staggered above the field so waves trickle in
    pub const SPAWN_Y_MIN: i32 = -5;
    pub const SPAWN_Y_MAX: i32 = 0;

    /// Avatar glyph while alive
    pub const AVATAR_GLYPH: &str = "X";
    /// Explosion glyph shown after death (3 cells wide)
    pub const DEATH_GLYPH: &str = "* *";
    /// Obstacle glyph
    pub const OBSTACLE_GLYPH: char = 'o';

    /// Flat teleport penalty before the difficulty multiplier
    pub const TELEPORT_PENALTY: i64 = 50;
}
