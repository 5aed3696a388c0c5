//! Field geometry and spatial rules
//!
//! Exact-cell checks on an integer grid: collision, near-miss, boundary
//! clamps, and the bottom-edge removal rule. Obstacle counts stay in the
//! tens, so plain O(n) scans beat any spatial index here.

use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::state::{Avatar, Obstacle};

/// Smallest field that can hold the movement band plus the 3-cell death glyph
const MIN_WIDTH: i32 = 5;
/// Two header rows, the header border, one playable row, the avatar row, and
/// the bottom border
const MIN_HEIGHT: i32 = 6;

/// Fixed field geometry for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub width: i32,
    pub height: i32,
}

impl Field {
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(SimError::Configuration {
                width,
                height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }
        Ok(Self { width, height })
    }

    /// Leftmost column the avatar may occupy
    pub fn min_x(&self) -> i32 {
        1
    }

    /// Rightmost column the avatar may occupy
    pub fn max_x(&self) -> i32 {
        self.width - 2
    }

    /// The row the avatar lives on (just above the bottom border)
    pub fn avatar_row(&self) -> i32 {
        self.height - 2
    }

    /// Obstacles at or below this row have left the playable area
    pub fn bottom_row(&self) -> i32 {
        self.height - 1
    }

    /// Playable obstacle rows (below the header border, above the bottom border)
    pub fn playable_rows(&self) -> std::ops::Range<i32> {
        3..self.height - 1
    }

    /// Whether a manual move by `dx` is allowed from column `x`
    pub fn move_allowed(&self, x: i32, dx: i32) -> bool {
        if dx < 0 { x > self.min_x() } else { x < self.max_x() }
    }
}

/// True iff any obstacle occupies exactly the avatar's cell
pub fn check_collision(avatar: &Avatar, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|rock| rock.x == avatar.x && rock.y == avatar.y)
}

/// True iff the obstacle just reached the avatar's row within one column of
/// the avatar. Evaluated only on fall-tick frames, right after the fall step.
pub fn is_near_miss(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    obstacle.y == avatar.y && (obstacle.x - avatar.x).abs() <= 1
}

/// Remove obstacles that fell past the playable area and return how many.
/// The count comes from the pre-removal set so it stays accurate.
pub fn count_and_remove_fallen(obstacles: &mut Vec<Obstacle>, field: &Field) -> usize {
    let bottom = field.bottom_row();
    let avoided = obstacles.iter().filter(|rock| rock.y >= bottom).count();
    obstacles.retain(|rock| rock.y < bottom);
    avoided
}
