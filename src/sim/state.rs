//! Session state and core simulation types
//!
//! Entities are plain state records. Every mutation goes through the four
//! documented mutators (`move_by`, `teleport`, `die`, `fall`); the tick
//! orchestrator never writes entity fields directly.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::field::Field;
use super::score::ScoreState;
use crate::consts::{AVATAR_GLYPH, DEATH_GLYPH, OBSTACLE_GLYPH};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Pre-session intro; resolves into `Running` on the first tick
    Starting,
    /// Active gameplay
    Running,
    /// Pause in effect; elapsed-time accounting is suspended
    Paused,
    /// Collision happened this tick; one death frame is emitted
    Dying,
    /// Terminal. The final score is fixed and readable.
    Ended,
}

/// Which side a teleport jumps toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeleportDirection {
    Left,
    Right,
}

/// The player-controlled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
    /// 1 while alive, 3 once the explosion glyph is showing
    pub glyph_width: i32,
}

impl Avatar {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            alive: true,
            glyph_width: 1,
        }
    }

    /// Move horizontally. The caller clamps against the field bounds before
    /// calling; `dx` is -1 or +1.
    pub fn move_by(&mut self, dx: i32) {
        self.x += dx;
    }

    /// Jump to a uniformly random column in `[min_x, x-1]` (left) or
    /// `[x+1, max_x]` (right). Fails when the interval is empty, e.g. a left
    /// teleport from `x == min_x`; the caller treats that as a no-op.
    pub fn teleport<R: Rng>(
        &mut self,
        rng: &mut R,
        min_x: i32,
        max_x: i32,
        direction: TeleportDirection,
    ) -> Result<i32, SimError> {
        let (lo, hi) = match direction {
            TeleportDirection::Left => (min_x, self.x - 1),
            TeleportDirection::Right => (self.x + 1, max_x),
        };
        if lo > hi {
            return Err(SimError::InvalidRange { min_x: lo, max_x: hi });
        }
        self.x = rng.random_range(lo..=hi);
        Ok(self.x)
    }

    /// Transition to dead, once. The 3-cell explosion glyph replaces the
    /// avatar, shifted left one cell so it stays centered on the old column.
    pub fn die(&mut self) {
        if self.alive {
            self.alive = false;
            self.glyph_width = 3;
            self.x -= 1;
            log::debug!("avatar died at x={}, y={}", self.x, self.y);
        }
    }

    /// Glyph the render sink should draw for the avatar
    pub fn glyph(&self) -> &'static str {
        if self.alive { AVATAR_GLYPH } else { DEATH_GLYPH }
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
}

impl Obstacle {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Advance one row down, unconditionally
    pub fn fall(&mut self) {
        self.y += 1;
    }

    pub fn glyph(&self) -> char {
        OBSTACLE_GLYPH
    }
}

/// Complete session state, owned exclusively by the tick orchestrator
#[derive(Debug, Clone)]
pub struct Session {
    /// Field geometry, constant for the session
    pub field: Field,
    pub avatar: Avatar,
    /// Frozen once the phase leaves `Running`
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreState,
    pub phase: SessionPhase,
    /// Session seed for reproducibility
    pub seed: u64,
    /// Ticks spent in `Running`; drives the spawn/fall/wave schedules
    pub frame_count: u64,
    /// Obstacles per spawn wave; grows on the fixed schedule
    pub rocks_per_wave: u32,
    pub(crate) rng: Pcg32,
    /// Clock reading when the session entered `Running`, shifted forward on
    /// resume so pauses never count toward elapsed time
    pub(crate) started_at: Option<Duration>,
    pub(crate) paused_at: Option<Duration>,
    /// Elapsed seconds as of the last active tick
    pub(crate) elapsed: f64,
    pub(crate) final_score: Option<i64>,
    pub(crate) aborted: bool,
}

impl Session {
    /// Create a session on a `width x height` field. The avatar starts at the
    /// horizontal center of the row above the bottom border.
    pub fn new(width: i32, height: i32, seed: u64) -> Result<Self, SimError> {
        let field = Field::new(width, height)?;
        let avatar = Avatar::new(width / 2, field.avatar_row());
        Ok(Self {
            field,
            avatar,
            obstacles: Vec::new(),
            score: ScoreState::new(),
            phase: SessionPhase::Starting,
            seed,
            frame_count: 0,
            rocks_per_wave: 1,
            rng: Pcg32::seed_from_u64(seed),
            started_at: None,
            paused_at: None,
            elapsed: 0.0,
            final_score: None,
            aborted: false,
        })
    }

    /// Elapsed play seconds at clock reading `now`, excluding paused time.
    /// Frozen at the pause snapshot while paused.
    pub fn elapsed_seconds(&self, now: Duration) -> f64 {
        let Some(started) = self.started_at else {
            return 0.0;
        };
        let effective = self.paused_at.unwrap_or(now);
        effective.saturating_sub(started).as_secs_f64()
    }

    /// The final score, valid only once the session has ended. Computed at
    /// the `Ended` transition and immutable thereafter.
    pub fn final_score(&self) -> Option<i64> {
        self.final_score
    }

    /// True when the session was quit out of the intro before ever running
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}
