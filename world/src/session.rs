//! Mutable player-facing state for a single session.

use std::time::Duration;

use cabin_chase_core::{
    layout::{CROUCHING_EYE_HEIGHT, STANDING_EYE_HEIGHT},
    Pickups, SessionSnapshot,
};
use glam::Vec3;

/// Session flags, counters and the player's position.
///
/// `last_valid_position` only changes right before a move is attempted, so a
/// rollback always lands on a spot that an earlier interaction pass accepted.
#[derive(Clone, Debug)]
pub(crate) struct GameSession {
    pub(crate) player: Vec3,
    pub(crate) last_valid_position: Vec3,
    pub(crate) crouching: bool,
    pub(crate) hidden: bool,
    pub(crate) in_cabin: bool,
    pub(crate) alive: bool,
    pub(crate) game_over: bool,
    pub(crate) started: bool,
    pub(crate) using_mouse_camera: bool,
    pub(crate) pickups: Pickups,
    pub(crate) enemy_speed: f32,
    pub(crate) elapsed: Duration,
    pub(crate) dead_for: Duration,
    pub(crate) last_camera_toggle: Option<Duration>,
}

impl GameSession {
    pub(crate) fn new(player: Vec3, enemy_speed: f32) -> Self {
        Self {
            player,
            last_valid_position: player,
            crouching: false,
            hidden: false,
            in_cabin: false,
            alive: true,
            game_over: false,
            started: false,
            using_mouse_camera: false,
            pickups: Pickups::default(),
            enemy_speed,
            elapsed: Duration::ZERO,
            dead_for: Duration::ZERO,
            last_camera_toggle: None,
        }
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.started && self.alive && !self.game_over
    }

    pub(crate) fn eye_height(&self) -> f32 {
        if self.crouching {
            CROUCHING_EYE_HEIGHT
        } else {
            STANDING_EYE_HEIGHT
        }
    }

    /// Accumulates time spent dead and reports whether game over was just reached.
    pub(crate) fn advance_death_timer(&mut self, dt: Duration, delay: Duration) -> bool {
        if !self.started || self.alive || self.game_over {
            return false;
        }
        self.dead_for = self.dead_for.saturating_add(dt);
        if self.dead_for >= delay {
            self.game_over = true;
            return true;
        }
        false
    }

    pub(crate) fn camera_toggle_allowed(&self, debounce: Duration) -> bool {
        self.last_camera_toggle
            .map_or(true, |last| self.elapsed.saturating_sub(last) >= debounce)
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            player: self.player,
            last_valid_position: self.last_valid_position,
            crouching: self.crouching,
            hidden: self.hidden,
            in_cabin: self.in_cabin,
            alive: self.alive,
            game_over: self.game_over,
            started: self.started,
            using_mouse_camera: self.using_mouse_camera,
            pickups: self.pickups,
            enemy_speed: self.enemy_speed,
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_timer_fires_exactly_at_delay() {
        let delay = Duration::from_secs(3);
        let mut session = GameSession::new(Vec3::ZERO, 1.0);
        session.started = true;
        assert!(!session.advance_death_timer(Duration::from_secs(10), delay));

        session.alive = false;
        assert!(!session.advance_death_timer(Duration::from_millis(2_999), delay));
        assert!(!session.game_over);
        assert!(session.advance_death_timer(Duration::from_millis(1), delay));
        assert!(session.game_over);
        assert!(!session.advance_death_timer(Duration::from_secs(1), delay));
    }

    #[test]
    fn camera_toggle_respects_debounce() {
        let debounce = Duration::from_millis(250);
        let mut session = GameSession::new(Vec3::ZERO, 1.0);
        assert!(session.camera_toggle_allowed(debounce));

        session.last_camera_toggle = Some(Duration::from_secs(1));
        session.elapsed = Duration::from_millis(1_200);
        assert!(!session.camera_toggle_allowed(debounce));
        session.elapsed = Duration::from_millis(1_250);
        assert!(session.camera_toggle_allowed(debounce));
    }
}
