#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic placement of props and collectibles.
//!
//! Candidate positions are drawn uniformly and redrawn while they fall inside
//! the home exclusion region. The loop is unbounded; `World::new` refuses
//! playfields whose bounds lie entirely inside that region.

use cabin_chase_core::{
    Command, EntityCategory, Event, PickupKind, Playfield, Rect, SessionConfig,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Distance around the home region in which redeemed pickups reappear.
pub const RESPAWN_REACH: f32 = 8.0;

const PLACEMENT_STREAM: u64 = 1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tree_count: u32,
    bush_count: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided prop counts and seed.
    #[must_use]
    pub const fn new(tree_count: u32, bush_count: u32, rng_seed: u64) -> Self {
        Self {
            tree_count,
            bush_count,
            rng_seed,
        }
    }

    /// Extracts the placement parameters from a session configuration.
    #[must_use]
    pub const fn from_session(config: &SessionConfig) -> Self {
        Self::new(config.tree_count, config.bush_count, config.seed)
    }
}

/// Pure system that emits spawn commands for scene props and pickups.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        rng.set_stream(PLACEMENT_STREAM);
        Self { config, rng }
    }

    /// Scatters trees, bushes and one instance of every pickup over the playfield.
    pub fn populate(&mut self, playfield: &Playfield, out: &mut Vec<Command>) {
        for _ in 0..self.config.tree_count {
            let position = self.sample(&playfield.bounds, &playfield.home);
            out.push(Command::SpawnEntity {
                category: EntityCategory::TreeTrunk,
                position,
            });
            out.push(Command::SpawnEntity {
                category: EntityCategory::TreeFoliage,
                position,
            });
        }

        for _ in 0..self.config.bush_count {
            let position = self.sample(&playfield.bounds, &playfield.home);
            out.push(Command::SpawnEntity {
                category: EntityCategory::Bush,
                position,
            });
        }

        for kind in PickupKind::ALL {
            let position = self.sample(&playfield.bounds, &playfield.home);
            out.push(Command::SpawnEntity {
                category: kind.category(),
                position,
            });
        }
    }

    /// Consumes world events and answers every redemption with a fresh pickup set.
    pub fn handle(&mut self, events: &[Event], playfield: &Playfield, out: &mut Vec<Command>) {
        let redemptions = events
            .iter()
            .filter(|event| matches!(event, Event::ObjectiveRedeemed { .. }))
            .count();
        if redemptions == 0 {
            return;
        }

        let area = playfield
            .home
            .expanded(RESPAWN_REACH)
            .intersect(&playfield.bounds);
        for _ in 0..redemptions {
            for kind in PickupKind::ALL {
                let position = self.sample(&area, &playfield.home);
                out.push(Command::SpawnEntity {
                    category: kind.category(),
                    position,
                });
            }
        }
    }

    fn sample(&mut self, area: &Rect, exclusion: &Rect) -> Vec2 {
        let (min, max) = (area.min(), area.max());
        loop {
            let candidate = Vec2::new(
                self.rng.gen_range(min.x..=max.x),
                self.rng.gen_range(min.y..=max.y),
            );
            if !exclusion.contains(candidate) {
                return candidate;
            }
        }
    }
}
