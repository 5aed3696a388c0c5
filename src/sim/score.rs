//! Composite scoring engine
//!
//! Independent additive accumulators composed by [`ScoreState::total`].
//! The difficulty and decay timers are watermarked against *actual* elapsed
//! time, not nominal boundaries, so their schedules drift when ticks arrive
//! late. That drift is part of the scoring balance; do not "fix" it.

use serde::{Deserialize, Serialize};

use crate::consts::TELEPORT_PENALTY;

/// Seconds between difficulty multiplier steps
const DIFFICULTY_INTERVAL_SECS: f64 = 30.0;
/// Multiplier growth per step
const DIFFICULTY_STEP: f64 = 0.1;
/// Decay starts this many seconds in, then ticks every `DECAY_INTERVAL_SECS`
const DECAY_START_SECS: f64 = 300.0;
const DECAY_INTERVAL_SECS: f64 = 10.0;

/// Survival milestones, high-to-low; later thresholds supersede earlier ones
const MILESTONES: [(f64, i64); 3] = [(300.0, 2000), (120.0, 1000), (60.0, 500)];

/// Score accumulators for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub base_score: i64,
    /// Recomputed from elapsed time each update, not incremented
    pub time_score: i64,
    pub rock_avoidance_score: i64,
    pub near_miss_score: i64,
    pub level_up_bonus: i64,
    pub survival_milestone_bonus: i64,
    /// Ever-growing linear penalty for very long sessions
    pub score_decay: i64,
    pub teleport_penalty_total: i64,
    /// Always >= 1.0; applied after the zero clamp on the component sum
    pub difficulty_multiplier: f64,
    /// Multiplies avoidance (not near-miss) credit; reset by manual moves
    pub combo: u32,
    last_difficulty_increase: f64,
    last_decay_time: f64,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            base_score: 0,
            time_score: 0,
            rock_avoidance_score: 0,
            near_miss_score: 0,
            level_up_bonus: 0,
            survival_milestone_bonus: 0,
            score_decay: 0,
            teleport_penalty_total: 0,
            difficulty_multiplier: 1.0,
            combo: 0,
            last_difficulty_increase: 0.0,
            last_decay_time: 0.0,
        }
    }

    /// Fold one active tick's events into the accumulators.
    ///
    /// `elapsed` is play time in seconds (pauses excluded), `rocks_avoided`
    /// and `near_misses` are this tick's counts, `rocks_per_wave` the current
    /// wave size.
    pub fn update(
        &mut self,
        elapsed: f64,
        rocks_avoided: usize,
        near_misses: usize,
        rocks_per_wave: u32,
    ) {
        self.time_score = elapsed as i64;
        self.rock_avoidance_score += rocks_avoided as i64 * 5 * i64::from(self.combo);
        self.near_miss_score += near_misses as i64 * 2;

        // Difficulty ramps every 30s of play; the watermark resets to the
        // actual elapsed time, so the schedule drifts under late ticks
        if elapsed - self.last_difficulty_increase >= DIFFICULTY_INTERVAL_SECS {
            self.difficulty_multiplier += DIFFICULTY_STEP;
            self.last_difficulty_increase = elapsed;
        }

        // Level-up bonus thresholds against the bonus's own magnitude, so no
        // separate wave counter is needed
        if i64::from(rocks_per_wave) > self.level_up_bonus / 100 {
            self.level_up_bonus += 100;
        }

        // One-time survival milestones; a later threshold supersedes, never
        // stacks on, an earlier one
        for (threshold, bonus) in MILESTONES {
            if elapsed >= threshold {
                if self.survival_milestone_bonus < bonus {
                    self.survival_milestone_bonus = bonus;
                }
                break;
            }
        }

        if elapsed >= DECAY_START_SECS && elapsed - self.last_decay_time >= DECAY_INTERVAL_SECS {
            self.score_decay += 1;
            self.last_decay_time = elapsed;
        }
    }

    /// One qualifying near miss happened this fall tick
    pub fn bump_combo(&mut self) {
        self.combo += 1;
    }

    /// Any manual move intent breaks the combo
    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Charge one successful teleport, scaled by the current difficulty
    pub fn apply_teleport_penalty(&mut self) {
        let penalty = (TELEPORT_PENALTY as f64 * self.difficulty_multiplier) as i64;
        self.teleport_penalty_total += penalty;
        log::debug!(
            "teleport penalty applied: {penalty}, total {}",
            self.teleport_penalty_total
        );
    }

    /// Compose the total. The component sum is clamped at zero before the
    /// multiplier; pure and safe to call any number of times.
    pub fn total(&self) -> i64 {
        let components = self.base_score
            + self.time_score
            + self.rock_avoidance_score
            + self.near_miss_score
            + self.level_up_bonus
            + self.survival_milestone_bonus
            - self.score_decay
            - self.teleport_penalty_total;
        ((components.max(0) as f64) * self.difficulty_multiplier) as i64
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}
