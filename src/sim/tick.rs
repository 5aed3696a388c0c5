//! Per-tick simulation orchestrator
//!
//! One cooperative tick loop, no parallel workers. Each call to [`tick`] is
//! atomic over the session state: the decoded intent is applied, the world
//! advanced, the score fed, and a frame descriptor returned. Cadence and
//! input polling belong to the caller; gameplay speed follows the external
//! clock reading, not the tick rate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::field::{check_collision, count_and_remove_fallen, is_near_miss};
use super::state::{Obstacle, Session, SessionPhase, TeleportDirection};
use crate::consts::{
    FALL_INTERVAL_TICKS, SPAWN_INTERVAL_TICKS, SPAWN_Y_MAX, SPAWN_Y_MIN,
    WAVE_GROWTH_INTERVAL_TICKS,
};
use crate::frame::Frame;
use crate::observer::{SessionEvent, SessionObserver};

/// Decoded input intent for a single tick. Key-code decoding (including any
/// secondary pause binding) happens upstream of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Intent {
    #[default]
    None,
    MoveLeft,
    MoveRight,
    TeleportLeft,
    TeleportRight,
    TogglePause,
    Quit,
}

/// Advance the session by one tick.
///
/// `now` is a monotonic elapsed-time reading from the external clock; the
/// engine is a pure function of it plus accumulated pause time. Returns the
/// frame descriptor for the render sink.
pub fn tick(
    session: &mut Session,
    intent: Intent,
    now: Duration,
    observer: &mut dyn SessionObserver,
) -> Frame {
    match session.phase {
        SessionPhase::Starting => {
            // Cancelling the intro means the session never ran
            if intent == Intent::Quit {
                session.aborted = true;
                end_session(session, observer);
                return Frame::describe(session, session.elapsed);
            }
            // The intro resolves this tick; the world starts moving next tick
            session.started_at = Some(now);
            session.phase = SessionPhase::Running;
            log::debug!("session started");
            observer.on_event(&SessionEvent::Started);
            return Frame::describe(session, 0.0);
        }
        SessionPhase::Dying => {
            // The death frame went out last tick; the session is over
            end_session(session, observer);
            return Frame::describe(session, session.elapsed);
        }
        SessionPhase::Ended => {
            return Frame::describe(session, session.elapsed);
        }
        SessionPhase::Running | SessionPhase::Paused => {}
    }

    apply_intent(session, intent, now, observer);

    if session.phase == SessionPhase::Running {
        advance_world(session, now);
        if check_collision(&session.avatar, &session.obstacles) {
            enter_dying(session, observer);
        }
    }

    let elapsed = match session.phase {
        SessionPhase::Running | SessionPhase::Paused => {
            session.elapsed = session.elapsed_seconds(now);
            session.elapsed
        }
        _ => session.elapsed,
    };
    Frame::describe(session, elapsed)
}

/// Apply the tick's decoded intent, honoring the state machine
fn apply_intent(
    session: &mut Session,
    intent: Intent,
    now: Duration,
    observer: &mut dyn SessionObserver,
) {
    match intent {
        Intent::Quit => {
            end_session(session, observer);
        }
        Intent::TogglePause => match session.phase {
            SessionPhase::Running => {
                session.paused_at = Some(now);
                session.phase = SessionPhase::Paused;
                log::debug!("session paused");
                observer.on_event(&SessionEvent::PauseToggled { paused: true });
            }
            SessionPhase::Paused => {
                // Shift the start forward so paused time never counts
                if let (Some(started), Some(paused)) = (session.started_at, session.paused_at) {
                    session.started_at = Some(started + now.saturating_sub(paused));
                }
                session.paused_at = None;
                session.phase = SessionPhase::Running;
                log::debug!("session resumed");
                observer.on_event(&SessionEvent::PauseToggled { paused: false });
            }
            _ => {}
        },
        Intent::MoveLeft | Intent::MoveRight if session.phase == SessionPhase::Running => {
            // Any manual move breaks the combo, landed or not
            session.score.reset_combo();
            let dx = if intent == Intent::MoveLeft { -1 } else { 1 };
            if session.field.move_allowed(session.avatar.x, dx) {
                session.avatar.move_by(dx);
            }
        }
        Intent::TeleportLeft | Intent::TeleportRight
            if session.phase == SessionPhase::Running =>
        {
            session.score.reset_combo();
            resolve_teleport(session, intent, observer);
        }
        _ => {}
    }
}

/// Resolve a teleport intent: random jump, penalty, and the one collision
/// check that runs outside the per-tick pass (a teleport can land on a rock)
fn resolve_teleport(session: &mut Session, intent: Intent, observer: &mut dyn SessionObserver) {
    let direction = if intent == Intent::TeleportLeft {
        TeleportDirection::Left
    } else {
        TeleportDirection::Right
    };
    let from_x = session.avatar.x;
    let (min_x, max_x) = (session.field.min_x(), session.field.max_x());
    match session.avatar.teleport(&mut session.rng, min_x, max_x, direction) {
        Ok(to_x) => {
            session.score.apply_teleport_penalty();
            log::debug!("avatar teleported {direction:?} from x={from_x} to x={to_x}");
            observer.on_event(&SessionEvent::Teleported { from_x, to_x });
            if check_collision(&session.avatar, &session.obstacles) {
                enter_dying(session, observer);
            }
        }
        Err(err) => {
            // Empty interval: treat as a no-op, never surface to the player
            log::debug!("teleport rejected at x={from_x}: {err}");
            observer.on_event(&SessionEvent::TeleportRejected { x: from_x });
        }
    }
}

/// Advance obstacles, spawn waves on schedule, and feed the scoring engine
fn advance_world(session: &mut Session, now: Duration) {
    session.frame_count += 1;
    let elapsed = session.elapsed_seconds(now);

    if session.frame_count % SPAWN_INTERVAL_TICKS == 0 {
        spawn_wave(session);
        if session.frame_count % WAVE_GROWTH_INTERVAL_TICKS == 0 {
            session.rocks_per_wave += 1;
        }
    }

    // Obstacles advance at half the tick rate, decoupling render cadence
    // from fall speed. Near misses are judged right after each fall step.
    let mut near_misses = 0;
    if session.frame_count % FALL_INTERVAL_TICKS == 0 {
        let avatar = session.avatar;
        for rock in &mut session.obstacles {
            rock.fall();
            if is_near_miss(&avatar, rock) {
                near_misses += 1;
                session.score.bump_combo();
            }
        }
    }

    let avoided = count_and_remove_fallen(&mut session.obstacles, &session.field);
    session
        .score
        .update(elapsed, avoided, near_misses, session.rocks_per_wave);
}

/// Spawn one wave of obstacles at staggered above-field rows
pub fn spawn_wave(session: &mut Session) {
    use rand::Rng;
    let (min_x, max_x) = (session.field.min_x(), session.field.max_x());
    for _ in 0..session.rocks_per_wave {
        let x = session.rng.random_range(min_x..=max_x);
        let y = session.rng.random_range(SPAWN_Y_MIN..=SPAWN_Y_MAX);
        session.obstacles.push(Obstacle::new(x, y));
    }
}

/// Collision happened: kill the avatar and hold one frame in `Dying` so the
/// sink can show the explosion glyph. The obstacle collection freezes here.
fn enter_dying(session: &mut Session, observer: &mut dyn SessionObserver) {
    let (x, y) = (session.avatar.x, session.avatar.y);
    log::debug!("collision detected at x={x}, y={y}");
    observer.on_event(&SessionEvent::Collision { x, y });
    session.avatar.die();
    observer.on_event(&SessionEvent::Death {
        x: session.avatar.x,
        y: session.avatar.y,
    });
    session.phase = SessionPhase::Dying;
}

/// Terminal transition: fix the final score and report it once
fn end_session(session: &mut Session, observer: &mut dyn SessionObserver) {
    if session.phase == SessionPhase::Ended {
        return;
    }
    session.phase = SessionPhase::Ended;
    let final_score = session.score.total();
    session.final_score = Some(final_score);
    log::debug!(
        "session ended: score={final_score}, aborted={}",
        session.aborted
    );
    observer.on_event(&SessionEvent::Ended {
        final_score,
        aborted: session.aborted,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    /// Observer that records every event for assertions
    #[derive(Default)]
    struct Recorder {
        events: Vec<SessionEvent>,
    }

    impl SessionObserver for Recorder {
        fn on_event(&mut self, event: &SessionEvent) {
            self.events.push(*event);
        }
    }

    fn at(tick_index: u64) -> Duration {
        Duration::from_millis(tick_index * 50)
    }

    fn running_session() -> Session {
        let mut session = Session::new(40, 20, 42).unwrap();
        tick(&mut session, Intent::None, at(0), &mut NoopObserver);
        assert_eq!(session.phase, SessionPhase::Running);
        session
    }

    #[test]
    fn test_starting_resolves_into_running() {
        let mut session = Session::new(40, 20, 42).unwrap();
        assert_eq!(session.phase, SessionPhase::Starting);
        let mut recorder = Recorder::default();
        tick(&mut session, Intent::None, at(0), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Running);
        assert!(matches!(recorder.events[0], SessionEvent::Started));
    }

    #[test]
    fn test_quit_during_intro_aborts_without_running() {
        let mut session = Session::new(40, 20, 42).unwrap();
        let mut recorder = Recorder::default();
        tick(&mut session, Intent::Quit, at(0), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Ended);
        assert!(session.aborted());
        assert!(matches!(
            recorder.events.last(),
            Some(SessionEvent::Ended { aborted: true, .. })
        ));
        assert_eq!(session.frame_count, 0);
    }

    #[test]
    fn test_wave_spawns_at_tick_20_and_falls_every_2_ticks() {
        let mut session = running_session();
        for i in 1..20 {
            tick(&mut session, Intent::None, at(i), &mut NoopObserver);
            assert!(session.obstacles.is_empty(), "no spawn before tick 20");
        }

        tick(&mut session, Intent::None, at(20), &mut NoopObserver);
        assert_eq!(session.obstacles.len(), 1);
        let rock = session.obstacles[0];
        assert!((1..=38).contains(&rock.x));
        // Spawn rows are [-5, 0]; tick 20 is also a fall tick
        assert!((-4..=1).contains(&rock.y));

        let y_after_spawn = session.obstacles[0].y;
        tick(&mut session, Intent::None, at(21), &mut NoopObserver);
        assert_eq!(session.obstacles[0].y, y_after_spawn, "odd ticks do not fall");
        tick(&mut session, Intent::None, at(22), &mut NoopObserver);
        assert_eq!(session.obstacles[0].y, y_after_spawn + 1);
    }

    #[test]
    fn test_wave_size_grows_every_100_ticks() {
        let mut session = running_session();
        for i in 1..=100 {
            tick(&mut session, Intent::None, at(i), &mut NoopObserver);
        }
        assert_eq!(session.rocks_per_wave, 2);
    }

    #[test]
    fn test_collision_flows_through_dying_to_ended() {
        let mut session = running_session();
        // One row above the avatar; tick 2 is the next fall tick
        session.obstacles.push(Obstacle::new(
            session.avatar.x,
            session.avatar.y - 1,
        ));

        let mut recorder = Recorder::default();
        tick(&mut session, Intent::None, at(1), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Running, "no fall on odd ticks");
        let frame = tick(&mut session, Intent::None, at(2), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Dying);
        assert!(!frame.avatar.alive);
        assert_eq!(frame.avatar.glyph, "* *");
        assert!(recorder
            .events
            .iter()
            .any(|e| matches!(e, SessionEvent::Collision { .. })));
        assert!(recorder
            .events
            .iter()
            .any(|e| matches!(e, SessionEvent::Death { .. })));

        // One extra frame in Dying, then terminal
        tick(&mut session, Intent::None, at(3), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Ended);
        assert!(session.final_score().is_some());

        // Ended is terminal and the score is immutable
        let score = session.final_score().unwrap();
        tick(&mut session, Intent::None, at(4), &mut recorder);
        assert_eq!(session.phase, SessionPhase::Ended);
        assert_eq!(session.final_score(), Some(score));
    }

    #[test]
    fn test_near_miss_bumps_combo_and_move_resets_it() {
        let mut session = running_session();
        // Lands on the avatar row next fall tick, one column to the side
        session.obstacles.push(Obstacle::new(
            session.avatar.x - 1,
            session.avatar.y - 1,
        ));
        tick(&mut session, Intent::None, at(1), &mut NoopObserver);
        tick(&mut session, Intent::None, at(2), &mut NoopObserver);
        assert_eq!(session.score.combo, 1);
        assert_eq!(session.score.near_miss_score, 2);

        tick(&mut session, Intent::MoveRight, at(3), &mut NoopObserver);
        assert_eq!(session.score.combo, 0);
    }

    #[test]
    fn test_manual_move_clamps_at_field_edge() {
        let mut session = running_session();
        session.avatar.x = 1;
        tick(&mut session, Intent::MoveLeft, at(1), &mut NoopObserver);
        assert_eq!(session.avatar.x, 1);
        tick(&mut session, Intent::MoveRight, at(2), &mut NoopObserver);
        assert_eq!(session.avatar.x, 2);
    }

    #[test]
    fn test_pause_excludes_elapsed_time() {
        let mut session = running_session();
        for i in 1..=20 {
            tick(&mut session, Intent::None, at(i), &mut NoopObserver);
        }
        let before = session.elapsed;
        assert!((before - 1.0).abs() < 1e-9);

        tick(&mut session, Intent::TogglePause, at(21), &mut NoopObserver);
        assert_eq!(session.phase, SessionPhase::Paused);

        // A long pause: resume 100 seconds later
        let resume_at = at(21) + Duration::from_secs(100);
        tick(&mut session, Intent::TogglePause, resume_at, &mut NoopObserver);
        assert_eq!(session.phase, SessionPhase::Running);

        let frame = tick(
            &mut session,
            Intent::None,
            resume_at + Duration::from_millis(50),
            &mut NoopObserver,
        );
        assert!(frame.header.elapsed_seconds < 2.0, "pause time leaked into elapsed");
    }

    #[test]
    fn test_world_is_frozen_while_paused() {
        let mut session = running_session();
        session.obstacles.push(Obstacle::new(5, 10));
        tick(&mut session, Intent::TogglePause, at(1), &mut NoopObserver);
        let frame_count = session.frame_count;
        for i in 2..=10 {
            tick(&mut session, Intent::None, at(i), &mut NoopObserver);
        }
        assert_eq!(session.frame_count, frame_count);
        assert_eq!(session.obstacles[0].y, 10);
        // Movement intents are ignored while paused
        let x = session.avatar.x;
        tick(&mut session, Intent::MoveLeft, at(11), &mut NoopObserver);
        assert_eq!(session.avatar.x, x);
    }

    #[test]
    fn test_quit_from_running_ends_directly() {
        let mut session = running_session();
        tick(&mut session, Intent::Quit, at(1), &mut NoopObserver);
        assert_eq!(session.phase, SessionPhase::Ended);
        assert!(!session.aborted());
        assert!(session.final_score().is_some());
        assert!(session.avatar.alive, "quit bypasses Dying");
    }

    #[test]
    fn test_successful_teleport_charges_penalty() {
        let mut session = running_session();
        let mut recorder = Recorder::default();
        tick(&mut session, Intent::TeleportRight, at(1), &mut recorder);
        assert_eq!(session.score.teleport_penalty_total, 50);
        assert!(session.avatar.x > 20);
        assert!(recorder
            .events
            .iter()
            .any(|e| matches!(e, SessionEvent::Teleported { from_x: 20, .. })));
    }

    #[test]
    fn test_teleport_with_empty_interval_is_a_no_op() {
        let mut session = running_session();
        session.avatar.x = 1;
        let mut recorder = Recorder::default();
        tick(&mut session, Intent::TeleportLeft, at(1), &mut recorder);
        assert_eq!(session.avatar.x, 1);
        assert_eq!(session.score.teleport_penalty_total, 0);
        assert_eq!(session.phase, SessionPhase::Running);
        assert!(recorder
            .events
            .iter()
            .any(|e| matches!(e, SessionEvent::TeleportRejected { x: 1 })));
    }

    #[test]
    fn test_teleport_onto_obstacle_kills_immediately() {
        let mut session = running_session();
        let row = session.avatar.y;
        // Every landing cell to the right is occupied
        for x in 21..=38 {
            session.obstacles.push(Obstacle::new(x, row));
        }
        tick(&mut session, Intent::TeleportRight, at(1), &mut NoopObserver);
        assert_eq!(session.phase, SessionPhase::Dying);
        // Penalty still applied: the teleport itself succeeded
        assert_eq!(session.score.teleport_penalty_total, 50);
    }

    #[test]
    fn test_fixed_seed_replays_identically() {
        let run = |seed: u64| {
            let mut session = Session::new(40, 20, seed).unwrap();
            for i in 0..200 {
                tick(&mut session, Intent::None, at(i), &mut NoopObserver);
            }
            (session.obstacles.clone(), session.score.total())
        };
        assert_eq!(run(9), run(9));
    }
}
