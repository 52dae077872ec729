use renderer::{Destroy, Engine, Scene};
use scene::{Asset, Names};

// Attaches a single asset to the scene and drives its first animation.
#[derive(Default)]
pub struct SimpleViewer {
    entities: Vec<renderer::Entity>,
    animation_count: usize,
}

impl SimpleViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_asset(
        &mut self,
        engine: &mut Engine,
        scene: &mut Scene,
        asset: &mut Asset,
        names: &Names,
    ) {
        firestorm::profile_method!(set_asset);

        scene.remove_entities(&self.entities);
        asset.transform_to_unit_cube(engine);

        self.entities = asset.entities();
        scene.add_entities(&self.entities);
        self.animation_count = asset.animator().map_or(0, |a| a.animation_count());

        let named = self
            .entities
            .iter()
            .filter_map(|&entity| names.name(entity))
            .count();
        tracing::debug!(
            "Attached {} entities ({named} named, {} renderables)",
            self.entities.len(),
            asset.renderables().len()
        );
    }

    pub fn apply_animation(&self, engine: &mut Engine, asset: &mut Asset, now: f64) {
        if self.animation_count == 0 {
            return;
        }
        asset.apply_animation(engine, 0, now);
    }

    pub const fn animation_count(&self) -> usize {
        self.animation_count
    }

    pub fn entities(&self) -> &[renderer::Entity] {
        &self.entities
    }
}

impl Destroy<Scene> for SimpleViewer {
    fn destroy_with(&mut self, scene: &mut Scene) {
        firestorm::profile_method!(destroy_with);

        scene.remove_entities(&self.entities);
        self.entities.clear();
        self.animation_count = 0;
    }
}
