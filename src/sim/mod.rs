//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by decoded input intents and an external monotonic clock
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The one tick function in [`tick`] owns every state mutation; entities are
//! plain records mutated only through their documented methods.

pub mod error;
pub mod field;
pub mod score;
pub mod state;
pub mod tick;

pub use error::SimError;
pub use field::{Field, check_collision, count_and_remove_fallen, is_near_miss};
pub use score::ScoreState;
pub use state::{Avatar, Obstacle, Session, SessionPhase, TeleportDirection};
pub use tick::{Intent, spawn_wave, tick};
