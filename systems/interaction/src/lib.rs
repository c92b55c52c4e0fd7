#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick proximity pass between the player and every world entity.
//!
//! The resolver never mutates the world. It scans an immutable
//! [`EntityView`] in ascending identifier order and queues commands for the
//! world to apply once the scan is over, which is also how collected pickups
//! leave the directory without disturbing the scan in progress.

use cabin_chase_core::{
    layout::{CABIN_DEPTH, CABIN_HALF_WIDTH, DOOR_GAP_HALF_WIDTH, PLAYER_CLEARANCE},
    Command, EntityCategory, EntitySnapshot, EntityView, Event, Playfield, SessionSnapshot,
};
use glam::{Vec2, Vec3};

/// Circular trigger around an entity anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proximity {
    /// Trigger radius measured in three dimensions.
    pub radius: f32,
    /// Vertical offset applied to the entity position to obtain the anchor.
    pub y_offset: f32,
}

impl Proximity {
    const fn new(radius: f32, y_offset: f32) -> Self {
        Self { radius, y_offset }
    }

    fn reaches(&self, entity: &EntitySnapshot, player: Vec3) -> bool {
        let anchor = entity.position + Vec3::Y * self.y_offset;
        anchor.distance(player) < self.radius
    }
}

/// Circular trigger used for entities of the provided category, if any.
#[must_use]
pub const fn proximity(category: EntityCategory) -> Option<Proximity> {
    match category {
        EntityCategory::TreeTrunk => Some(Proximity::new(0.8, 1.0)),
        EntityCategory::Bush => Some(Proximity::new(1.5, 0.5)),
        EntityCategory::Mushroom => Some(Proximity::new(1.0, 0.5)),
        EntityCategory::Bee => Some(Proximity::new(1.2, 1.5)),
        EntityCategory::Nail => Some(Proximity::new(1.0, 0.3)),
        EntityCategory::Candy => Some(Proximity::new(1.2, 1.0)),
        EntityCategory::EnemyTorso => Some(Proximity::new(2.0, -1.0)),
        _ => None,
    }
}

/// Interaction system that validates the player's position every tick.
#[derive(Debug, Default)]
pub struct Interaction;

#[derive(Debug)]
struct Scan {
    player: Vec3,
    rolled_back: bool,
    bush_hit: Option<bool>,
    completed: bool,
}

impl Interaction {
    /// Consumes world events and immutable views to emit interaction commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        entities: &EntityView,
        playfield: &Playfield,
        out: &mut Vec<Command>,
    ) {
        let ticked = events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if !ticked || !session.is_playing() {
            return;
        }

        let mut scan = Scan {
            player: session.player,
            rolled_back: false,
            bush_hit: None,
            completed: true,
        };

        if !playfield.bounds.contains(planar(scan.player)) {
            scan.roll_back(session, out);
        }

        if let Some(doorway) = entities.first_of(EntityCategory::Doorway) {
            let in_cabin = inside_cabin(planar(doorway.position), planar(scan.player));
            if in_cabin != session.in_cabin {
                out.push(Command::SetInCabin { in_cabin });
            }
        }

        let mut pickups = session.pickups;
        for entity in entities.iter() {
            match entity.category {
                EntityCategory::Wall => {
                    if blocked_by_wall(entity, planar(scan.player)) {
                        scan.roll_back(session, out);
                        scan.completed = false;
                        break;
                    }
                }
                EntityCategory::Doorway => {
                    if blocked_by_door_frame(entity, planar(scan.player)) {
                        scan.roll_back(session, out);
                        scan.completed = false;
                        break;
                    }
                }
                EntityCategory::TreeTrunk => {
                    if scan.touches(entity) {
                        scan.roll_back(session, out);
                    }
                }
                EntityCategory::Bush => {
                    if scan.touches(entity) {
                        scan.bush_hit = Some(session.crouching);
                    }
                }
                EntityCategory::Mushroom | EntityCategory::Bee | EntityCategory::Nail => {
                    let Some(kind) = entity.category.pickup_kind() else {
                        continue;
                    };
                    if scan.touches(entity) && pickups.collect(kind) {
                        out.push(Command::CollectPickup {
                            entity: entity.id,
                            kind,
                        });
                    }
                }
                EntityCategory::Candy => {
                    if scan.touches(entity) && pickups.redeem() {
                        out.push(Command::RedeemObjective { entity: entity.id });
                    }
                }
                EntityCategory::EnemyTorso => {
                    if scan.touches(entity) {
                        out.push(Command::KillPlayer);
                        scan.completed = false;
                        break;
                    }
                }
                EntityCategory::Terrain
                | EntityCategory::TreeFoliage
                | EntityCategory::EnemyHead => {}
            }
        }

        // An interrupted scan only updates concealment if a bush was reached.
        let hidden = if scan.completed {
            Some(scan.bush_hit.unwrap_or(false))
        } else {
            scan.bush_hit
        };
        if let Some(hidden) = hidden.filter(|hidden| *hidden != session.hidden) {
            out.push(Command::SetHidden { hidden });
        }
    }
}

impl Scan {
    fn touches(&self, entity: &EntitySnapshot) -> bool {
        proximity(entity.category).is_some_and(|trigger| trigger.reaches(entity, self.player))
    }

    fn roll_back(&mut self, session: &SessionSnapshot, out: &mut Vec<Command>) {
        self.player = session.last_valid_position;
        if !self.rolled_back {
            self.rolled_back = true;
            out.push(Command::RollbackPlayer);
        }
    }
}

/// Cabin interior extends from the doorway towards negative Z.
fn inside_cabin(doorway: Vec2, player: Vec2) -> bool {
    (player.x - doorway.x).abs() < CABIN_HALF_WIDTH
        && player.y < doorway.y
        && player.y > doorway.y - CABIN_DEPTH
}

fn blocked_by_wall(wall: &EntitySnapshot, player: Vec2) -> bool {
    let offset = (player - planar(wall.position)).abs();
    let half_x = wall.scale.x / 2.0 + PLAYER_CLEARANCE;
    let half_z = wall.scale.z / 2.0 + PLAYER_CLEARANCE;
    offset.x < half_x && offset.y < half_z
}

/// The doorway wall blocks both frame segments and leaves the gap open.
fn blocked_by_door_frame(doorway: &EntitySnapshot, player: Vec2) -> bool {
    let anchor = planar(doorway.position);
    if (player.y - anchor.y).abs() >= doorway.scale.z / 2.0 + PLAYER_CLEARANCE {
        return false;
    }

    let dx = player.x - anchor.x;
    let outer = CABIN_HALF_WIDTH + PLAYER_CLEARANCE;
    let left = dx >= -outer && dx < -DOOR_GAP_HALF_WIDTH;
    let right = dx > DOOR_GAP_HALF_WIDTH && dx <= outer;
    left || right
}

fn planar(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}
