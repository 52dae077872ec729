use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

#[derive(Default)]
pub struct EntityManager {
    next: u32,
    alive: HashSet<Entity>,
}

impl Entity {
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl EntityManager {
    pub fn create(&mut self) -> Entity {
        self.next += 1;
        let entity = Entity(self.next);
        self.alive.insert(entity);
        entity
    }

    pub fn destroy(&mut self, entity: Entity) {
        if !self.alive.remove(&entity) {
            tracing::warn!("Destroying unknown entity {}", entity.0);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}
