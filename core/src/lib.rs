#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cabin Chase simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots such as
//! [`EntityView`] and [`SessionSnapshot`], and respond exclusively with new
//! command batches.

use std::{f32::consts::PI, time::Duration};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cabin Chase.";

/// Elevation of the flat table that hosts the cabin.
pub const TABLE_ELEVATION: f32 = 3.0;
/// World X coordinate where the table gives way to the cosine ramp.
pub const RAMP_START_X: f32 = 20.0;
/// World X coordinate where the ramp flattens into the lower plain.
pub const RAMP_END_X: f32 = 30.0;

/// Fixed geometric offsets shared by scene setup and interaction checks.
pub mod layout {
    /// Half width of the cabin along world X, measured from the doorway.
    pub const CABIN_HALF_WIDTH: f32 = 4.0;
    /// Depth of the cabin along negative world Z, measured from the doorway.
    pub const CABIN_DEPTH: f32 = 6.0;
    /// Half width of the passable gap in the doorway wall.
    pub const DOOR_GAP_HALF_WIDTH: f32 = 1.0;
    /// Thickness of every cabin wall.
    pub const WALL_THICKNESS: f32 = 0.3;
    /// Height of every cabin wall.
    pub const WALL_HEIGHT: f32 = 3.0;
    /// Distance kept between the player's eye and solid walls.
    pub const PLAYER_CLEARANCE: f32 = 0.3;
    /// Player eye height above the terrain while standing.
    pub const STANDING_EYE_HEIGHT: f32 = 1.0;
    /// Player eye height above the terrain while crouching.
    pub const CROUCHING_EYE_HEIGHT: f32 = 0.5;
    /// Enemy head height above the terrain profile.
    pub const ENEMY_HEAD_HEIGHT: f32 = 2.2;
    /// Enemy torso height above the terrain profile.
    pub const ENEMY_TORSO_HEIGHT: f32 = 1.2;
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the title phase and starts the playable session.
    StartSession,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Attempts to translate the player across the XZ plane.
    ///
    /// The world records the current position as the last valid position
    /// before the move is committed, so a later rollback restores it.
    MovePlayer {
        /// Requested displacement along world X (`x`) and world Z (`y`).
        delta: Vec2,
    },
    /// Flips the crouching flag.
    ToggleCrouch,
    /// Flips between the keyboard and mouse camera, subject to debounce.
    ToggleCameraMode,
    /// Moves and orients both enemy body parts in lockstep.
    SteerEnemy {
        /// New world-space position of the enemy head.
        head: Vec3,
        /// Heading around the vertical axis in radians.
        yaw: f32,
        /// Pitch towards the player in radians; informational only.
        pitch: f32,
        /// Behaviour state the enemy runs after this tick.
        state: EnemyState,
    },
    /// Restores the player to the last validated position.
    RollbackPlayer,
    /// Records whether the player stands inside the cabin.
    SetInCabin {
        /// Whether the player is inside the safe structure.
        in_cabin: bool,
    },
    /// Records whether the player is concealed from the enemy.
    SetHidden {
        /// Whether the player is hidden.
        hidden: bool,
    },
    /// Picks up a single-pickup collectible and removes it from the world.
    CollectPickup {
        /// Entity that was touched.
        entity: EntityId,
        /// Kind of pickup the entity represents.
        kind: PickupKind,
    },
    /// Trades a full set of pickups for a candy at the objective marker.
    RedeemObjective {
        /// Objective marker that was touched.
        entity: EntityId,
    },
    /// Marks the player as caught by the enemy.
    KillPlayer,
    /// Adds a new entity resting on the terrain at the provided XZ position.
    SpawnEntity {
        /// Category tag assigned to the new entity.
        category: EntityCategory,
        /// Placement along world X (`x`) and world Z (`y`).
        position: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the session left the title phase.
    SessionStarted,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Reports that a rejected move was rolled back.
    PlayerRolledBack {
        /// Position the player was restored to.
        to: Vec3,
    },
    /// Reports a change of the crouching flag.
    CrouchChanged {
        /// Whether the player now crouches.
        crouching: bool,
    },
    /// Reports a change of the active camera mode.
    CameraModeChanged {
        /// Whether the mouse-driven camera is active.
        using_mouse_camera: bool,
    },
    /// Reports an enemy behaviour transition.
    EnemyStateChanged {
        /// State before the transition.
        from: EnemyState,
        /// State after the transition.
        to: EnemyState,
    },
    /// Reports a change of the hidden flag.
    HiddenChanged {
        /// Whether the player is now hidden.
        hidden: bool,
    },
    /// Reports that the player entered or left the cabin.
    CabinChanged {
        /// Whether the player is now inside the cabin.
        in_cabin: bool,
    },
    /// Confirms that a collectible was picked up and removed.
    PickupCollected {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of pickup that was collected.
        kind: PickupKind,
    },
    /// Confirms that a full pickup set was traded for a candy.
    ObjectiveRedeemed {
        /// Total number of candies collected so far.
        candies: u32,
        /// Enemy speed after the increase.
        enemy_speed: f32,
    },
    /// Confirms that a new entity joined the world.
    EntitySpawned {
        /// Identifier assigned to the new entity.
        entity: EntityId,
        /// Category tag of the new entity.
        category: EntityCategory,
        /// World-space position of the new entity.
        position: Vec3,
    },
    /// Announces that the enemy caught the player.
    PlayerDied,
    /// Announces that the death delay elapsed and the session ended.
    GameOver,
}

/// Unique identifier assigned to a world entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Category tag fixed when an entity is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// Ground plane built from the height field.
    Terrain,
    /// Solid tree trunk the player cannot walk through.
    TreeTrunk,
    /// Decorative canopy above a trunk.
    TreeFoliage,
    /// Solid cabin wall.
    Wall,
    /// Cabin front wall with a passable door gap; anchors the cabin region.
    Doorway,
    /// Passable bush that conceals a crouching player.
    Bush,
    /// Single-pickup collectible.
    Mushroom,
    /// Single-pickup collectible.
    Bee,
    /// Single-pickup collectible.
    Nail,
    /// Repeatable objective marker that trades a full set for a candy.
    Candy,
    /// Enemy head; moves with the torso.
    EnemyHead,
    /// Enemy torso; touching it is lethal.
    EnemyTorso,
}

impl EntityCategory {
    /// Stem used to build entity names such as `TreeTrunk3`.
    #[must_use]
    pub const fn name_stem(self) -> &'static str {
        match self {
            Self::Terrain => "Terrain",
            Self::TreeTrunk => "TreeTrunk",
            Self::TreeFoliage => "TreeFoliage",
            Self::Wall => "WallFull",
            Self::Doorway => "Doorway",
            Self::Bush => "Bush",
            Self::Mushroom => "Mushroom",
            Self::Bee => "Bee",
            Self::Nail => "Nail",
            Self::Candy => "Candy",
            Self::EnemyHead => "EnemyHead",
            Self::EnemyTorso => "EnemyTorso",
        }
    }

    /// Pickup kind represented by the category, if it is a single pickup.
    #[must_use]
    pub const fn pickup_kind(self) -> Option<PickupKind> {
        match self {
            Self::Mushroom => Some(PickupKind::Mushroom),
            Self::Bee => Some(PickupKind::Bee),
            Self::Nail => Some(PickupKind::Nail),
            _ => None,
        }
    }

    /// Reports whether the category belongs to the enemy character.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::EnemyHead | Self::EnemyTorso)
    }
}

/// The three collectibles that make up a set redeemable for a candy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Mushroom pickup.
    Mushroom,
    /// Bee pickup.
    Bee,
    /// Nail pickup.
    Nail,
}

impl PickupKind {
    /// Every pickup kind in a stable order.
    pub const ALL: [PickupKind; 3] = [Self::Mushroom, Self::Bee, Self::Nail];

    /// Entity category used when spawning an instance of this pickup.
    #[must_use]
    pub const fn category(self) -> EntityCategory {
        match self {
            Self::Mushroom => EntityCategory::Mushroom,
            Self::Bee => EntityCategory::Bee,
            Self::Nail => EntityCategory::Nail,
        }
    }
}

/// Behaviour tag stored on entities; only the enemy ever leaves `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyState {
    /// Tag carried by every non-enemy entity.
    #[default]
    None = 0,
    /// Wandering along a persistent heading.
    Patrol = 1,
    /// Pursuing the player.
    Chase = 2,
}

/// Pickup counters packed into one aggregate.
///
/// Mushroom, bee and nail counters only ever hold 0 or 1; candies are unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickups {
    mushroom: u8,
    bee: u8,
    nail: u8,
    candy: u32,
}

impl Pickups {
    /// Counter for the provided pickup kind.
    #[must_use]
    pub const fn count(&self, kind: PickupKind) -> u8 {
        match kind {
            PickupKind::Mushroom => self.mushroom,
            PickupKind::Bee => self.bee,
            PickupKind::Nail => self.nail,
        }
    }

    /// Number of candies redeemed so far.
    #[must_use]
    pub const fn candies(&self) -> u32 {
        self.candy
    }

    /// Reports whether every single-pickup counter is set.
    #[must_use]
    pub const fn has_full_set(&self) -> bool {
        self.mushroom == 1 && self.bee == 1 && self.nail == 1
    }

    /// Sets the counter for `kind`, returning `false` when it was already set.
    pub fn collect(&mut self, kind: PickupKind) -> bool {
        let slot = match kind {
            PickupKind::Mushroom => &mut self.mushroom,
            PickupKind::Bee => &mut self.bee,
            PickupKind::Nail => &mut self.nail,
        };
        if *slot != 0 {
            return false;
        }
        *slot = 1;
        true
    }

    /// Trades a full set for a candy, returning `false` when the set is incomplete.
    pub fn redeem(&mut self) -> bool {
        if !self.has_full_set() {
            return false;
        }
        self.mushroom = 0;
        self.bee = 0;
        self.nail = 0;
        self.candy = self.candy.saturating_add(1);
        true
    }
}

/// Tunable parameters for a session.
///
/// Missing fields fall back to [`SessionConfig::default`] when deserialised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of height samples along world X.
    pub grid_width: u32,
    /// Number of height samples along world Z.
    pub grid_length: u32,
    /// Distance kept between the playable bounds and the grid edge.
    pub bounds_margin: f32,
    /// Distance under which a visible player is spotted by a patrolling enemy.
    pub spotting_radius: f32,
    /// Distance beyond which a hidden player shakes off a chasing enemy.
    pub chase_radius: f32,
    /// Interval between patrol heading rerolls, in milliseconds.
    pub patrol_reroll_ms: u64,
    /// Enemy speed in units per second at the start of the session.
    pub enemy_base_speed: f32,
    /// Enemy speed added for every redeemed candy.
    pub enemy_speed_increment: f32,
    /// Delay between death and game over, in milliseconds.
    pub death_delay_ms: u64,
    /// Minimum interval between camera mode toggles, in milliseconds.
    pub camera_toggle_debounce_ms: u64,
    /// Player walking speed in units per second.
    pub player_speed: f32,
    /// Seed for every random draw in the session.
    pub seed: u64,
    /// Number of trees scattered during scene setup.
    pub tree_count: u32,
    /// Number of bushes scattered during scene setup.
    pub bush_count: u32,
}

impl SessionConfig {
    /// Interval between patrol heading rerolls.
    #[must_use]
    pub const fn patrol_reroll_interval(&self) -> Duration {
        Duration::from_millis(self.patrol_reroll_ms)
    }

    /// Delay between death and game over.
    #[must_use]
    pub const fn death_delay(&self) -> Duration {
        Duration::from_millis(self.death_delay_ms)
    }

    /// Minimum interval between camera mode toggles.
    #[must_use]
    pub const fn camera_toggle_debounce(&self) -> Duration {
        Duration::from_millis(self.camera_toggle_debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_length: 50,
            bounds_margin: 1.0,
            spotting_radius: 5.0,
            chase_radius: 5.0,
            patrol_reroll_ms: 5_000,
            enemy_base_speed: 1.5,
            enemy_speed_increment: 0.2,
            death_delay_ms: 3_000,
            camera_toggle_debounce_ms: 250,
            player_speed: 3.0,
            seed: 0x6361_6269_6e5f_6368,
            tree_count: 40,
            bush_count: 25,
        }
    }
}

/// Axis-aligned rectangle on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    min: Vec2,
    max: Vec2,
}

impl Rect {
    /// Creates a rectangle from two corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Corner with the smallest coordinates.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Corner with the largest coordinates.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Reports whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn covers(&self, other: &Rect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Grows the rectangle by `amount` on every side.
    #[must_use]
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Clips the rectangle to `other`.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Self {
        let min = self.min.max(other.min);
        Self {
            min,
            max: self.max.min(other.max).max(min),
        }
    }
}

/// Static layout of the playable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    /// Number of height samples along world X.
    pub width: u32,
    /// Number of height samples along world Z.
    pub length: u32,
    /// Region the player may occupy.
    pub bounds: Rect,
    /// Home region around the cabin that random placement avoids.
    pub home: Rect,
}

/// Immutable representation of a single entity used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier allocated by the world.
    pub id: EntityId,
    /// Display name such as `TreeTrunk3`.
    pub name: String,
    /// Category tag fixed at creation.
    pub category: EntityCategory,
    /// World-space position.
    pub position: Vec3,
    /// Heading around the vertical axis in radians.
    pub yaw: f32,
    /// Pitch in radians.
    pub pitch: f32,
    /// Per-axis scale; walls use it as their footprint.
    pub scale: Vec3,
    /// Behaviour tag, `EnemyState::None` for non-enemy entities.
    pub enemy_state: EnemyState,
}

/// Read-only snapshot describing every entity in the world.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// First entity carrying the provided category tag.
    #[must_use]
    pub fn first_of(&self, category: EntityCategory) -> Option<&EntitySnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.category == category)
    }
}

/// Player-facing session state captured for systems and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    /// Current player eye position.
    pub player: Vec3,
    /// Most recent position known to be outside all solid geometry.
    pub last_valid_position: Vec3,
    /// Whether the player crouches.
    pub crouching: bool,
    /// Whether the player is concealed.
    pub hidden: bool,
    /// Whether the player stands inside the cabin.
    pub in_cabin: bool,
    /// Whether the player is alive.
    pub alive: bool,
    /// Whether the session ended.
    pub game_over: bool,
    /// Whether the session left the title phase.
    pub started: bool,
    /// Whether the mouse camera is active.
    pub using_mouse_camera: bool,
    /// Pickup counters.
    pub pickups: Pickups,
    /// Current enemy speed in units per second.
    pub enemy_speed: f32,
    /// Total simulated time.
    pub elapsed: Duration,
}

impl SessionSnapshot {
    /// Reports whether movement, AI and interactions should run.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.started && self.alive && !self.game_over
    }
}

/// Three-band elevation profile shared by terrain generation and the enemy.
///
/// West of [`RAMP_START_X`] lies a flat table, a half cosine wave descends
/// until [`RAMP_END_X`], and the lower plain beyond sits at zero.
#[must_use]
pub fn terrain_elevation(x: f32, _z: f32) -> f32 {
    if x < RAMP_START_X {
        TABLE_ELEVATION
    } else if x < RAMP_END_X {
        let distance = x - RAMP_START_X;
        let span = RAMP_END_X - RAMP_START_X;
        0.5 * TABLE_ELEVATION * (PI * distance / span).cos() + 0.5 * TABLE_ELEVATION
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_bands_are_continuous() {
        assert_eq!(terrain_elevation(5.0, 7.0), TABLE_ELEVATION);
        assert!((terrain_elevation(RAMP_START_X, 0.0) - TABLE_ELEVATION).abs() < 1e-5);
        assert!((terrain_elevation(25.0, 0.0) - TABLE_ELEVATION / 2.0).abs() < 1e-5);
        assert!(terrain_elevation(RAMP_END_X - 1e-3, 0.0).abs() < 1e-4);
        assert_eq!(terrain_elevation(42.0, 3.0), 0.0);
    }

    #[test]
    fn pickups_collect_once_per_kind() {
        let mut pickups = Pickups::default();
        assert!(pickups.collect(PickupKind::Bee));
        assert!(!pickups.collect(PickupKind::Bee));
        assert_eq!(pickups.count(PickupKind::Bee), 1);
        assert!(!pickups.has_full_set());
    }

    #[test]
    fn redeem_requires_full_set() {
        let mut pickups = Pickups::default();
        assert!(pickups.collect(PickupKind::Mushroom));
        assert!(pickups.collect(PickupKind::Nail));
        assert!(!pickups.redeem());
        assert_eq!(pickups.candies(), 0);

        assert!(pickups.collect(PickupKind::Bee));
        assert!(pickups.redeem());
        assert_eq!(pickups.candies(), 1);
        for kind in PickupKind::ALL {
            assert_eq!(pickups.count(kind), 0);
        }
    }

    #[test]
    fn rect_contains_edges_and_clips() {
        let rect = Rect::from_corners(Vec2::new(4.0, 14.0), Vec2::new(16.0, 4.0));
        assert!(rect.contains(Vec2::new(4.0, 4.0)));
        assert!(rect.contains(Vec2::new(16.0, 14.0)));
        assert!(!rect.contains(Vec2::new(16.1, 10.0)));

        let bounds = Rect::from_corners(Vec2::splat(1.0), Vec2::splat(49.0));
        let reach = rect.expanded(8.0).intersect(&bounds);
        assert_eq!(reach.min(), Vec2::new(1.0, 1.0));
        assert_eq!(reach.max(), Vec2::new(24.0, 22.0));
        assert!(bounds.covers(&reach));
    }

    #[test]
    fn session_config_fills_missing_fields_from_defaults() {
        let config: SessionConfig = toml::from_str("seed = 7\ntree_count = 3\n").expect("parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.tree_count, 3);
        assert_eq!(config.grid_width, 50);
        assert_eq!(config.death_delay(), Duration::from_secs(3));
        assert_eq!(config.patrol_reroll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn enemy_state_tags_match_storage_values() {
        assert_eq!(EnemyState::None as u8, 0);
        assert_eq!(EnemyState::Patrol as u8, 1);
        assert_eq!(EnemyState::Chase as u8, 2);
        assert_eq!(EnemyState::default(), EnemyState::None);
    }
}
