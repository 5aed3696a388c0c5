//! Render-ready frame descriptor
//!
//! The engine emits one of these per tick; a display sink (terminal window,
//! test harness, JSON pipe) draws it. The obstacle list is complete and
//! unordered by row; culling to the playable rows is the sink's job.

use serde::Serialize;

use crate::sim::{Avatar, Session, SessionPhase};

/// Header stats shown above the playable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderStats {
    pub obstacle_count: usize,
    pub elapsed_seconds: f64,
    pub total_score: i64,
}

/// Avatar glyph + position + alive flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvatarSprite {
    pub x: i32,
    pub y: i32,
    pub glyph: &'static str,
    pub alive: bool,
}

/// One positioned obstacle glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObstacleSprite {
    pub x: i32,
    pub y: i32,
    pub glyph: char,
}

/// Everything a sink needs to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub header: HeaderStats,
    pub avatar: AvatarSprite,
    pub obstacles: Vec<ObstacleSprite>,
    pub phase: SessionPhase,
}

impl Frame {
    /// Snapshot the session at clock reading `elapsed_seconds`
    pub fn describe(session: &Session, elapsed_seconds: f64) -> Self {
        Self {
            header: HeaderStats {
                obstacle_count: session.obstacles.len(),
                elapsed_seconds,
                total_score: session.score.total(),
            },
            avatar: sprite_for(&session.avatar),
            obstacles: session
                .obstacles
                .iter()
                .map(|rock| ObstacleSprite {
                    x: rock.x,
                    y: rock.y,
                    glyph: rock.glyph(),
                })
                .collect(),
            phase: session.phase,
        }
    }
}

fn sprite_for(avatar: &Avatar) -> AvatarSprite {
    AvatarSprite {
        x: avatar.x,
        y: avatar.y,
        glyph: avatar.glyph(),
        alive: avatar.alive,
    }
}
