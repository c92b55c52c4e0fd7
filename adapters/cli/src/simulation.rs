//! Frame loop wiring the world to its systems.

use std::time::Duration;

use anyhow::{Context, Result};
use cabin_chase_core::{Command, Event, SessionConfig, SessionSnapshot};
use cabin_chase_system_enemy_ai::{Config as EnemyAiConfig, EnemyAi};
use cabin_chase_system_interaction::Interaction;
use cabin_chase_system_spawning::{Config as SpawningConfig, Spawning};
use cabin_chase_world::{self as world, query, World};
use tracing::{debug, info};

/// Owns the world and every system, and advances them one frame at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    enemy_ai: EnemyAi,
    interaction: Interaction,
    spawning: Spawning,
    frames: u64,
}

impl Simulation {
    /// Builds the world and scatters the initial props and pickups.
    pub(crate) fn new(config: SessionConfig) -> Result<Self> {
        let enemy_ai = EnemyAi::new(EnemyAiConfig::from_session(&config));
        let mut spawning = Spawning::new(SpawningConfig::from_session(&config));
        let mut world = World::new(config).context("failed to set up the world")?;

        let mut commands = Vec::new();
        spawning.populate(&query::playfield(&world), &mut commands);
        let spawned = commands.len();
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        debug!(spawned, "scene populated");

        Ok(Self {
            world,
            enemy_ai,
            interaction: Interaction,
            spawning,
            frames: 0,
        })
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn session(&self) -> SessionSnapshot {
        query::session(&self.world)
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame: clock, input, enemy, interactions, then respawns.
    pub(crate) fn step(&mut self, input: Vec<Command>, dt: Duration) -> Vec<Event> {
        self.frames += 1;

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        for command in input {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut commands = Vec::new();
        let session = query::session(&self.world);
        let enemy = query::enemy(&self.world);
        let playfield = query::playfield(&self.world);
        self.enemy_ai
            .handle(&events, &session, enemy.as_ref(), &playfield, &mut commands);
        self.apply_batch(commands, &mut events);

        let mut commands = Vec::new();
        let session = query::session(&self.world);
        let entities = query::entity_view(&self.world);
        self.interaction
            .handle(&events, &session, &entities, &playfield, &mut commands);
        self.apply_batch(commands, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(&events, &playfield, &mut commands);
        self.apply_batch(commands, &mut events);

        for event in &events {
            self.report(event);
        }
        events
    }

    fn apply_batch(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn report(&self, event: &Event) {
        match event {
            Event::SessionStarted => info!(frame = self.frames, "session started"),
            Event::PlayerDied => info!(frame = self.frames, "player caught by the enemy"),
            Event::GameOver => info!(frame = self.frames, "game over"),
            Event::ObjectiveRedeemed {
                candies,
                enemy_speed,
            } => info!(candies, enemy_speed, "candy redeemed"),
            Event::EnemyStateChanged { from, to } => {
                debug!(?from, ?to, frame = self.frames, "enemy state changed");
            }
            Event::CabinChanged { in_cabin } => debug!(in_cabin, "cabin status changed"),
            Event::HiddenChanged { hidden } => debug!(hidden, "concealment changed"),
            _ => {}
        }
    }
}
