#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Patrol/chase state machine that steers the enemy every tick.
//!
//! The system reads the enemy head snapshot and the session snapshot, decides
//! the behaviour for the tick and answers with a single
//! [`Command::SteerEnemy`]. The world moves head and torso together, so this
//! system never addresses the body parts individually.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use cabin_chase_core::{
    layout::ENEMY_HEAD_HEIGHT, terrain_elevation, Command, EnemyState, EntitySnapshot, Event,
    Playfield, SessionConfig, SessionSnapshot,
};
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Configuration parameters required to construct the enemy AI.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spotting_radius: f32,
    chase_radius: f32,
    reroll_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from explicit tuning values.
    #[must_use]
    pub const fn new(
        spotting_radius: f32,
        chase_radius: f32,
        reroll_interval: Duration,
        rng_seed: u64,
    ) -> Self {
        Self {
            spotting_radius,
            chase_radius,
            reroll_interval,
            rng_seed,
        }
    }

    /// Extracts the AI tuning from a session configuration.
    #[must_use]
    pub fn from_session(config: &SessionConfig) -> Self {
        Self::new(
            config.spotting_radius,
            config.chase_radius,
            config.patrol_reroll_interval(),
            config.seed,
        )
    }
}

/// Enemy behaviour system.
///
/// The patrol heading and the time since it was last rolled persist across
/// ticks; the heading only changes when a new one is rolled.
#[derive(Debug)]
pub struct EnemyAi {
    config: Config,
    heading: Vec2,
    since_reroll: Duration,
    rng: ChaCha8Rng,
}

#[derive(Clone, Copy, Debug)]
struct Steering {
    ground: Vec2,
    yaw: f32,
    pitch: f32,
    arrived: bool,
}

impl EnemyAi {
    /// Creates the AI and rolls its first patrol heading.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut ai = Self {
            config,
            heading: Vec2::X,
            since_reroll: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        };
        ai.reroll_heading();
        ai
    }

    /// Current patrol heading on the XZ plane.
    #[must_use]
    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    /// Consumes world events and immutable views to emit a steering command.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        enemy: Option<&EntitySnapshot>,
        playfield: &Playfield,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt: step } = event {
                dt = dt.saturating_add(*step);
            }
        }

        if dt.is_zero() || !session.is_playing() {
            return;
        }
        let Some(enemy) = enemy else {
            return;
        };
        // The reroll clock runs in both states.
        self.since_reroll = self.since_reroll.saturating_add(dt);

        let position = planar(enemy.position);
        let player = planar(session.player);
        let distance = position.distance(player);
        let step = session.enemy_speed * dt.as_secs_f32();

        let mut state = match enemy.enemy_state {
            EnemyState::None => EnemyState::Patrol,
            other => other,
        };

        if state == EnemyState::Patrol
            && distance < self.config.spotting_radius
            && !session.hidden
            && !session.in_cabin
        {
            state = EnemyState::Chase;
        }

        let steering = if state == EnemyState::Chase && !session.in_cabin {
            let steering = chase(enemy, session.player, step);
            if steering.arrived || (distance > self.config.chase_radius && session.hidden) {
                state = EnemyState::Patrol;
            }
            steering
        } else {
            state = EnemyState::Patrol;
            self.patrol(position, step, playfield)
        };

        if state != enemy.enemy_state {
            debug!(from = ?enemy.enemy_state, to = ?state, distance, "enemy behaviour changed");
        }

        out.push(Command::SteerEnemy {
            head: head_position(steering.ground),
            yaw: steering.yaw,
            pitch: steering.pitch,
            state,
        });
    }

    fn patrol(&mut self, position: Vec2, step: f32, playfield: &Playfield) -> Steering {
        if self.since_reroll >= self.config.reroll_interval {
            self.reroll_heading();
        }

        let mut next = position + self.heading * step;
        if !playfield.bounds.contains(next) {
            self.heading = -self.heading;
            self.since_reroll = Duration::ZERO;
            next = position + self.heading * step;
            if !playfield.bounds.contains(next) {
                next = position;
            }
        }

        Steering {
            ground: next,
            yaw: yaw_for(self.heading),
            pitch: 0.0,
            arrived: false,
        }
    }

    fn reroll_heading(&mut self) {
        let degrees = self.rng.gen_range(0.0_f32..360.0) + 90.0;
        let radians = degrees.to_radians();
        self.heading = Vec2::new(radians.cos(), radians.sin());
        self.since_reroll = Duration::ZERO;
        trace!(heading = ?self.heading, "patrol heading rerolled");
    }
}

fn chase(enemy: &EntitySnapshot, player: Vec3, step: f32) -> Steering {
    let position = planar(enemy.position);
    let offset = planar(player) - position;
    let remaining = offset.length();

    let (ground, arrived) = if remaining <= step {
        (planar(player), true)
    } else {
        (position + offset / remaining * step, false)
    };
    let yaw = if remaining > f32::EPSILON {
        yaw_for(offset / remaining)
    } else {
        enemy.yaw
    };
    let pitch = (player - enemy.position)
        .normalize_or_zero()
        .y
        .clamp(-1.0, 1.0)
        .asin();

    Steering {
        ground,
        yaw,
        pitch,
        arrived,
    }
}

/// Yaw that faces the model along `heading`, whose rest pose looks down +Z.
#[must_use]
pub fn yaw_for(heading: Vec2) -> f32 {
    heading.y.atan2(heading.x) - FRAC_PI_2
}

fn head_position(ground: Vec2) -> Vec3 {
    Vec3::new(
        ground.x,
        terrain_elevation(ground.x, ground.y) + ENEMY_HEAD_HEIGHT,
        ground.y,
    )
}

fn planar(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}
