use renderer::{Destroy, Engine};

use crate::{
    materials::{self, MaterialProvider, MaterialSource},
    parser, Asset, Names, Result,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct AssetConfiguration {
    pub material_source: MaterialSource,
}

// Owns every asset it creates: assets hold engine resources that only the loader knows
// how to release, so they are handed back through `destroy_asset` instead of dropped.
pub struct AssetLoader {
    materials: Box<dyn MaterialProvider>,
    live_assets: usize,
}

impl AssetLoader {
    pub fn create(engine: &mut Engine, config: AssetConfiguration) -> Self {
        firestorm::profile_method!(create);

        tracing::debug!("Creating asset loader ({:?})", config.material_source);
        Self {
            materials: materials::create_provider(engine, config.material_source),
            live_assets: 0,
        }
    }

    pub fn create_asset_from_binary(
        &mut self,
        engine: &mut Engine,
        names: &mut Names,
        bytes: &[u8],
    ) -> Result<Asset> {
        firestorm::profile_method!(create_asset_from_binary);

        let (document, blob) = parser::parse_binary(bytes)?;
        Ok(self.create_asset(engine, names, document, blob))
    }

    pub fn create_asset_from_json(
        &mut self,
        engine: &mut Engine,
        names: &mut Names,
        bytes: &[u8],
    ) -> Result<Asset> {
        firestorm::profile_method!(create_asset_from_json);

        let document = parser::parse_json(bytes)?;
        Ok(self.create_asset(engine, names, document, None))
    }

    fn create_asset(
        &mut self,
        engine: &mut Engine,
        names: &mut Names,
        document: gltf::Document,
        blob: Option<Vec<u8>>,
    ) -> Asset {
        let asset = parser::instantiate(engine, names, self.materials.as_mut(), document, blob);
        self.live_assets += 1;
        asset
    }

    pub fn destroy_asset(&mut self, engine: &mut Engine, names: &mut Names, mut asset: Asset) {
        firestorm::profile_method!(destroy_asset);

        asset
            .renderables
            .drain(..)
            .for_each(|entity| engine.destroy_renderable(entity));
        asset
            .instances
            .drain()
            .for_each(|(_, instance)| engine.destroy_material_instance(instance));
        asset
            .textures
            .drain(..)
            .for_each(|texture| engine.destroy_texture(texture));
        asset
            .entities()
            .into_iter()
            .for_each(|entity| engine.destroy_entity(entity));

        let forgotten = names.gc(engine.entities());
        self.live_assets = self.live_assets.saturating_sub(1);
        tracing::debug!("Destroyed asset ({forgotten} names released)");
    }

    pub fn destroy_materials(&mut self, engine: &mut Engine) {
        let count = self.materials.material_count();
        self.materials.destroy_with(engine);
        tracing::debug!("Destroyed {count} materials");
    }

    pub fn material_count(&self) -> usize {
        self.materials.material_count()
    }

    pub const fn live_assets(&self) -> usize {
        self.live_assets
    }

    pub fn destroy(mut self, engine: &mut Engine) {
        firestorm::profile_method!(destroy);

        if self.live_assets > 0 {
            tracing::warn!("Asset loader destroyed with {} live assets", self.live_assets);
        }
        if self.materials.material_count() > 0 {
            tracing::warn!("Asset loader destroyed before its materials");
            self.destroy_materials(engine);
        }
    }
}
