#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Cabin Chase.

mod directory;
mod height_field;
mod scene;
mod session;

use std::time::Duration;

use cabin_chase_core::{
    layout::{ENEMY_HEAD_HEIGHT, ENEMY_TORSO_HEIGHT},
    terrain_elevation, Command, EntityCategory, Event, Playfield, Rect, SessionConfig,
    WELCOME_BANNER,
};
use glam::{Vec2, Vec3};
use thiserror::Error;
use tracing::{debug, trace};

pub use self::height_field::HeightField;
use self::{directory::EntityDirectory, session::GameSession};

/// Reasons a world cannot be set up from the provided configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SetupError {
    /// The height field would contain no cells.
    #[error("height field needs a non-empty grid, got {width}x{length}")]
    EmptyGrid {
        /// Requested number of cells along world X.
        width: u32,
        /// Requested number of cells along world Z.
        length: u32,
    },
    /// A sample buffer does not match the declared dimensions.
    #[error("height field expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// Number of samples implied by the dimensions.
        expected: usize,
        /// Number of samples provided.
        actual: usize,
    },
    /// The bounds margin leaves no playable area.
    #[error("bounds margin {margin} leaves no playable area on a {width}x{length} grid")]
    InvalidBounds {
        /// Configured margin.
        margin: f32,
        /// Configured grid width.
        width: u32,
        /// Configured grid length.
        length: u32,
    },
    /// A radius or speed is not strictly positive.
    #[error("`{0}` must be a positive number")]
    NonPositiveTuning(&'static str),
    /// Rejection sampling could never find a spot outside the home region.
    #[error("the home exclusion region covers the whole playable area")]
    ExclusionCoversPlayfield,
}

/// Represents the authoritative Cabin Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SessionConfig,
    playfield: Playfield,
    height_field: HeightField,
    entities: EntityDirectory,
    session: GameSession,
}

impl World {
    /// Creates a world with the fixed scene layout, waiting on the title phase.
    pub fn new(config: SessionConfig) -> Result<Self, SetupError> {
        let playfield = validate(&config)?;
        let height_field =
            HeightField::from_fn(config.grid_width, config.grid_length, terrain_elevation)?;

        let mut entities = EntityDirectory::new();
        scene::build_fixed_structures(&mut entities, &height_field);

        let start = scene::PLAYER_START;
        let ground = Vec3::new(start.x, height_field.height_at(start.x, start.y), start.y);
        let mut session = GameSession::new(ground, config.enemy_base_speed);
        session.player.y += session.eye_height();
        session.last_valid_position = session.player;

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            playfield,
            height_field,
            entities,
            session,
        })
    }

    fn snap_to_terrain(&self, point: Vec2) -> Vec3 {
        Vec3::new(
            point.x,
            self.height_field.height_at(point.x, point.y) + self.session.eye_height(),
            point.y,
        )
    }
}

fn validate(config: &SessionConfig) -> Result<Playfield, SetupError> {
    let (width, length) = (config.grid_width, config.grid_length);
    if width == 0 || length == 0 {
        return Err(SetupError::EmptyGrid { width, length });
    }

    let margin = config.bounds_margin;
    let invalid_bounds = SetupError::InvalidBounds {
        margin,
        width,
        length,
    };
    if !(margin >= 0.0) || 2.0 * margin >= width.min(length) as f32 {
        return Err(invalid_bounds);
    }

    for (name, value) in [
        ("spotting_radius", config.spotting_radius),
        ("chase_radius", config.chase_radius),
        ("enemy_base_speed", config.enemy_base_speed),
        ("player_speed", config.player_speed),
    ] {
        if !(value > 0.0) {
            return Err(SetupError::NonPositiveTuning(name));
        }
    }

    let bounds = Rect::from_corners(
        Vec2::splat(margin),
        Vec2::new(width as f32 - margin, length as f32 - margin),
    );
    let home = scene::home_region();
    if home.covers(&bounds) {
        return Err(SetupError::ExclusionCoversPlayfield);
    }

    Ok(Playfield {
        width,
        length,
        bounds,
        home,
    })
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession => {
            if !world.session.started {
                world.session.started = true;
                out_events.push(Event::SessionStarted);
            }
        }
        Command::Tick { dt } => {
            world.session.elapsed = world.session.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            if world
                .session
                .advance_death_timer(dt, world.config.death_delay())
            {
                debug!(elapsed = ?world.session.elapsed, "death delay elapsed, game over");
                out_events.push(Event::GameOver);
            }
        }
        Command::MovePlayer { delta } => {
            if !world.session.is_playing() {
                return;
            }
            let from = world.session.player;
            world.session.last_valid_position = from;
            let to = world.snap_to_terrain(Vec2::new(from.x + delta.x, from.z + delta.y));
            world.session.player = to;
            out_events.push(Event::PlayerMoved { from, to });
        }
        Command::ToggleCrouch => {
            if !world.session.is_playing() {
                return;
            }
            world.session.crouching = !world.session.crouching;
            let player = world.session.player;
            world.session.player = world.snap_to_terrain(Vec2::new(player.x, player.z));
            out_events.push(Event::CrouchChanged {
                crouching: world.session.crouching,
            });
        }
        Command::ToggleCameraMode => {
            if !world
                .session
                .camera_toggle_allowed(world.config.camera_toggle_debounce())
            {
                return;
            }
            world.session.using_mouse_camera = !world.session.using_mouse_camera;
            world.session.last_camera_toggle = Some(world.session.elapsed);
            out_events.push(Event::CameraModeChanged {
                using_mouse_camera: world.session.using_mouse_camera,
            });
        }
        Command::SteerEnemy {
            head,
            yaw,
            pitch,
            state,
        } => {
            let torso = head - Vec3::Y * (ENEMY_HEAD_HEIGHT - ENEMY_TORSO_HEIGHT);
            let mut previous = None;
            for entity in world.entities.iter_mut() {
                let position = match entity.category {
                    EntityCategory::EnemyHead => head,
                    EntityCategory::EnemyTorso => torso,
                    _ => continue,
                };
                let _ = previous.get_or_insert(entity.enemy_state);
                entity.position = position;
                entity.yaw = yaw;
                entity.pitch = pitch;
                entity.enemy_state = state;
            }

            if let Some(from) = previous.filter(|from| *from != state) {
                out_events.push(Event::EnemyStateChanged { from, to: state });
            }
        }
        Command::RollbackPlayer => {
            let last = world.session.last_valid_position;
            let to = world.snap_to_terrain(Vec2::new(last.x, last.z));
            trace!(?to, "rolling player back");
            world.session.player = to;
            out_events.push(Event::PlayerRolledBack { to });
        }
        Command::SetInCabin { in_cabin } => {
            if world.session.in_cabin != in_cabin {
                world.session.in_cabin = in_cabin;
                out_events.push(Event::CabinChanged { in_cabin });
            }
        }
        Command::SetHidden { hidden } => {
            if world.session.hidden != hidden {
                world.session.hidden = hidden;
                out_events.push(Event::HiddenChanged { hidden });
            }
        }
        Command::CollectPickup { entity, kind } => {
            let matches_kind = world
                .entities
                .get(entity)
                .is_some_and(|target| target.category.pickup_kind() == Some(kind));
            if !matches_kind || !world.session.pickups.collect(kind) {
                return;
            }
            let _ = world.entities.remove(entity);
            debug!(entity = entity.get(), ?kind, "pickup collected");
            out_events.push(Event::PickupCollected { entity, kind });
        }
        Command::RedeemObjective { entity } => {
            let is_objective = world
                .entities
                .get(entity)
                .is_some_and(|target| target.category == EntityCategory::Candy);
            if !is_objective || !world.session.pickups.redeem() {
                return;
            }
            world.session.enemy_speed += world.config.enemy_speed_increment;
            let candies = world.session.pickups.candies();
            debug!(candies, enemy_speed = world.session.enemy_speed, "objective redeemed");
            out_events.push(Event::ObjectiveRedeemed {
                candies,
                enemy_speed: world.session.enemy_speed,
            });
        }
        Command::KillPlayer => {
            if world.session.started && world.session.alive {
                world.session.alive = false;
                world.session.dead_for = Duration::ZERO;
                debug!(player = ?world.session.player, "player caught");
                out_events.push(Event::PlayerDied);
            }
        }
        Command::SpawnEntity { category, position } => {
            let resting = scene::resting_position(&world.height_field, category, position);
            let entity = world
                .entities
                .insert(category, resting, scene::default_scale(category));
            out_events.push(Event::EntitySpawned {
                entity,
                category,
                position: resting,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cabin_chase_core::{EntityCategory, EntitySnapshot, EntityView, Playfield, SessionSnapshot};

    use super::{HeightField, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Static layout of the playable area.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Provides read-only access to the terrain height samples.
    #[must_use]
    pub fn height_field(world: &World) -> &HeightField {
        &world.height_field
    }

    /// Captures the player-facing session state.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        world.session.snapshot()
    }

    /// Captures a read-only view of every entity in ascending identifier order.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(world.entities.iter().map(|entity| entity.snapshot()).collect())
    }

    /// Snapshots every entity carrying the provided category tag.
    #[must_use]
    pub fn entities_of(world: &World, category: EntityCategory) -> Vec<EntitySnapshot> {
        world
            .entities
            .iter_category(category)
            .map(|entity| entity.snapshot())
            .collect()
    }

    /// Finds the first entity whose name contains `fragment`.
    #[must_use]
    pub fn find_entity(world: &World, fragment: &str) -> Option<EntitySnapshot> {
        world
            .entities
            .find_by_name(fragment)
            .map(|entity| entity.snapshot())
    }

    /// Snapshot of the enemy head, which drives the enemy's behaviour.
    #[must_use]
    pub fn enemy(world: &World) -> Option<EntitySnapshot> {
        world
            .entities
            .iter_category(EntityCategory::EnemyHead)
            .next()
            .map(|entity| entity.snapshot())
    }
}
