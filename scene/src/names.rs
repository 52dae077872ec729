use std::collections::HashMap;

use renderer::{Entity, EntityManager};

// Side table of human readable entity names, kept outside the engine so that any
// number of loaders or inspectors can share it.
#[derive(Default)]
pub struct Names {
    names: HashMap<Entity, String>,
}

impl Names {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity, name: impl Into<String>) {
        self.names.insert(entity, name.into());
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.names
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(&e, _)| e)
            .min()
    }

    // Drops the names of entities the registry no longer knows about.
    pub fn gc(&mut self, entities: &EntityManager) -> usize {
        let before = self.names.len();
        self.names.retain(|&e, _| entities.is_alive(e));
        before - self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
