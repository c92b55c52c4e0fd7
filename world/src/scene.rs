//! Fixed scene layout built when the world is created.

use cabin_chase_core::{
    layout::{
        CABIN_DEPTH, CABIN_HALF_WIDTH, ENEMY_HEAD_HEIGHT, ENEMY_TORSO_HEIGHT, WALL_HEIGHT,
        WALL_THICKNESS,
    },
    terrain_elevation, EntityCategory, Rect,
};
use glam::{Vec2, Vec3};

use crate::{directory::EntityDirectory, HeightField};

/// XZ anchor of the cabin doorway; the cabin extends towards negative Z.
pub(crate) const DOORWAY_POSITION: Vec2 = Vec2::new(10.0, 12.0);
/// Where the player stands when the session starts.
pub(crate) const PLAYER_START: Vec2 = Vec2::new(10.0, 16.0);
/// Where the enemy starts patrolling.
pub(crate) const ENEMY_START: Vec2 = Vec2::new(40.0, 40.0);

const HOME_MIN: Vec2 = Vec2::new(4.0, 4.0);
const HOME_MAX: Vec2 = Vec2::new(16.0, 14.0);
const FOLIAGE_RISE: f32 = 2.5;

/// Region around the cabin that random placement rejects.
pub(crate) fn home_region() -> Rect {
    Rect::from_corners(HOME_MIN, HOME_MAX)
}

/// Scale assigned to entities spawned without an explicit footprint.
pub(crate) fn default_scale(category: EntityCategory) -> Vec3 {
    match category {
        EntityCategory::TreeTrunk => Vec3::new(0.5, 3.0, 0.5),
        EntityCategory::TreeFoliage => Vec3::splat(2.5),
        EntityCategory::Bush => Vec3::splat(1.5),
        EntityCategory::Wall | EntityCategory::Doorway => {
            Vec3::new(2.0 * CABIN_HALF_WIDTH, WALL_HEIGHT, WALL_THICKNESS)
        }
        _ => Vec3::ONE,
    }
}

/// World-space resting position for an entity placed at `point`.
///
/// Props stand on the same height field cells the player walks on. The enemy
/// follows the continuous elevation profile it steers along.
pub(crate) fn resting_position(
    height_field: &HeightField,
    category: EntityCategory,
    point: Vec2,
) -> Vec3 {
    let cell = height_field.height_at(point.x, point.y);
    let (ground, rise) = match category {
        EntityCategory::EnemyHead => (terrain_elevation(point.x, point.y), ENEMY_HEAD_HEIGHT),
        EntityCategory::EnemyTorso => (terrain_elevation(point.x, point.y), ENEMY_TORSO_HEIGHT),
        EntityCategory::TreeFoliage => (cell, FOLIAGE_RISE),
        _ => (cell, 0.0),
    };
    Vec3::new(point.x, ground + rise, point.y)
}

/// Populates the terrain, the cabin, the objective marker and the enemy.
pub(crate) fn build_fixed_structures(directory: &mut EntityDirectory, height_field: &HeightField) {
    let (width, length) = (height_field.width(), height_field.length());
    let _ = directory.insert(
        EntityCategory::Terrain,
        Vec3::new(width as f32 / 2.0, 0.0, length as f32 / 2.0),
        Vec3::new(width as f32, 1.0, length as f32),
    );

    let door = DOORWAY_POSITION;
    let side_scale = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, CABIN_DEPTH);
    let walls = [
        (
            Vec2::new(door.x, door.y - CABIN_DEPTH),
            default_scale(EntityCategory::Wall),
        ),
        (
            Vec2::new(door.x - CABIN_HALF_WIDTH, door.y - CABIN_DEPTH / 2.0),
            side_scale,
        ),
        (
            Vec2::new(door.x + CABIN_HALF_WIDTH, door.y - CABIN_DEPTH / 2.0),
            side_scale,
        ),
    ];
    for (point, scale) in walls {
        let _ = directory.insert(
            EntityCategory::Wall,
            resting_position(height_field, EntityCategory::Wall, point),
            scale,
        );
    }

    let _ = directory.insert(
        EntityCategory::Doorway,
        resting_position(height_field, EntityCategory::Doorway, door),
        default_scale(EntityCategory::Doorway),
    );

    let objective = Vec2::new(door.x, door.y - CABIN_DEPTH / 2.0);
    let _ = directory.insert(
        EntityCategory::Candy,
        resting_position(height_field, EntityCategory::Candy, objective),
        default_scale(EntityCategory::Candy),
    );

    for part in [EntityCategory::EnemyHead, EntityCategory::EnemyTorso] {
        let _ = directory.insert(
            part,
            resting_position(height_field, part, ENEMY_START),
            default_scale(part),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> HeightField {
        HeightField::from_fn(50, 50, terrain_elevation).expect("non-empty grid")
    }

    #[test]
    fn fixed_structures_form_a_closed_cabin_with_one_doorway() {
        let mut directory = EntityDirectory::new();
        build_fixed_structures(&mut directory, &grid());

        assert_eq!(directory.iter_category(EntityCategory::Wall).count(), 3);
        assert_eq!(directory.iter_category(EntityCategory::Doorway).count(), 1);
        assert_eq!(directory.iter_category(EntityCategory::Candy).count(), 1);

        let candy = directory
            .iter_category(EntityCategory::Candy)
            .next()
            .expect("objective marker");
        assert!(home_region().contains(Vec2::new(candy.position.x, candy.position.z)));
    }

    #[test]
    fn enemy_parts_stack_on_the_plain() {
        let mut directory = EntityDirectory::new();
        build_fixed_structures(&mut directory, &grid());

        let head = directory.find_by_name("EnemyHead").expect("head");
        let torso = directory.find_by_name("EnemyTorso").expect("torso");
        assert_eq!(head.position.x, torso.position.x);
        assert_eq!(head.position.z, torso.position.z);
        assert!((head.position.y - ENEMY_HEAD_HEIGHT).abs() < 1e-6);
        assert!((torso.position.y - ENEMY_TORSO_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn props_rest_on_the_height_field_cell() {
        let field = grid();
        let point = Vec2::new(25.9, 16.0);
        let nail = resting_position(&field, EntityCategory::Nail, point);
        assert_eq!(nail.y, field.height_at(25.9, 16.0));
        assert_eq!(nail.y, terrain_elevation(25.0, 16.0));

        let foliage = resting_position(&field, EntityCategory::TreeFoliage, point);
        assert!((foliage.y - nail.y - FOLIAGE_RISE).abs() < 1e-6);

        let head = resting_position(&field, EntityCategory::EnemyHead, point);
        assert!((head.y - (terrain_elevation(25.9, 16.0) + ENEMY_HEAD_HEIGHT)).abs() < 1e-6);
    }
}
