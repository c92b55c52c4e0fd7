//! Named, positioned world objects stored in creation order.

use std::collections::HashMap;

use cabin_chase_core::{EnemyState, EntityCategory, EntityId, EntitySnapshot};
use glam::Vec3;

/// A single world object.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) category: EntityCategory,
    pub(crate) position: Vec3,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    pub(crate) scale: Vec3,
    pub(crate) enemy_state: EnemyState,
}

impl Entity {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            name: self.name.clone(),
            category: self.category,
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
            scale: self.scale,
            enemy_state: self.enemy_state,
        }
    }
}

/// Directory of entities that keeps ascending identifier order.
///
/// Identifiers grow monotonically and removal preserves the order of the
/// remaining entries, so every scan visits entities in creation order.
#[derive(Debug)]
pub(crate) struct EntityDirectory {
    entries: Vec<Entity>,
    next_id: EntityId,
    name_counters: HashMap<EntityCategory, u32>,
}

impl EntityDirectory {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: EntityId::new(0),
            name_counters: HashMap::new(),
        }
    }

    /// Inserts an entity named after its category stem, e.g. `Bush4`.
    pub(crate) fn insert(
        &mut self,
        category: EntityCategory,
        position: Vec3,
        scale: Vec3,
    ) -> EntityId {
        let counter = self.name_counters.entry(category).or_insert(0);
        *counter += 1;
        let name = format!("{}{}", category.name_stem(), counter);

        let id = self.next_id;
        self.next_id = EntityId::new(id.get() + 1);
        let enemy_state = if category.is_enemy() {
            EnemyState::Patrol
        } else {
            EnemyState::None
        };
        self.entries.push(Entity {
            id,
            name,
            category,
            position,
            yaw: 0.0,
            pitch: 0.0,
            scale,
            enemy_state,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|index| &self.entries[index])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entries.iter_mut()
    }

    pub(crate) fn iter_category(
        &self,
        category: EntityCategory,
    ) -> impl Iterator<Item = &Entity> + '_ {
        self.entries
            .iter()
            .filter(move |entity| entity.category == category)
    }

    /// First entity whose name contains `fragment`.
    pub(crate) fn find_by_name(&self, fragment: &str) -> Option<&Entity> {
        self.entries
            .iter()
            .find(|entity| entity.name.contains(fragment))
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entries
            .binary_search_by_key(&id, |entity| entity.id)
            .ok()
    }
}
