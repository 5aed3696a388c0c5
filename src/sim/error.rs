//! Simulation error taxonomy
//!
//! Only two things can fail: configuring a field too small to hold the
//! header, borders, and playable rows, and drawing a teleport target from an
//! empty interval. Everything else in a tick is total given valid inputs.

use thiserror::Error;

/// Errors surfaced by session construction and teleport resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// Teleport attempted with an empty target interval. Callers must guard
    /// or treat as a no-op; this never propagates to the player.
    #[error("teleport interval [{min_x}, {max_x}] is empty")]
    InvalidRange { min_x: i32, max_x: i32 },

    /// Field dimensions cannot fit the header rows, borders, avatar row, and
    /// at least one playable obstacle row. Fatal at session start.
    #[error("field {width}x{height} is too small (need at least {min_width}x{min_height})")]
    Configuration {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
}
