use std::collections::HashMap;

use renderer::{BlendMode, Destroy, Engine, Material, MaterialDesc, Parameters, TextureSlot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialSource {
    #[default]
    GenerateShaders,
    LoadUbershaders,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub blend: BlendMode,
    pub double_sided: bool,
    pub base_color: bool,
    pub metallic_roughness: bool,
    pub normal: bool,
    pub occlusion: bool,
    pub emissive: bool,
}

pub trait MaterialProvider: Destroy<Engine> {
    fn get_material(&mut self, engine: &mut Engine, key: &MaterialKey) -> Material;
    fn material_count(&self) -> usize;
}

// One specialized material per distinct key, compiled the first time it is needed.
#[derive(Default)]
pub struct ShaderGenerator {
    cache: HashMap<MaterialKey, Material>,
}

// Preloaded generalized materials, one per blend mode.
pub struct UbershaderLoader {
    materials: HashMap<BlendMode, Material>,
}

impl MaterialKey {
    pub fn from_gltf(material: &gltf::Material) -> Self {
        let pbr = material.pbr_metallic_roughness();
        Self {
            blend: match material.alpha_mode() {
                gltf::material::AlphaMode::Opaque => BlendMode::Opaque,
                gltf::material::AlphaMode::Mask => BlendMode::Masked,
                gltf::material::AlphaMode::Blend => BlendMode::Transparent,
            },
            double_sided: material.double_sided(),
            base_color: pbr.base_color_texture().is_some(),
            metallic_roughness: pbr.metallic_roughness_texture().is_some(),
            normal: material.normal_texture().is_some(),
            occlusion: material.occlusion_texture().is_some(),
            emissive: material.emissive_texture().is_some(),
        }
    }

    pub fn slots(&self) -> Vec<TextureSlot> {
        let enabled = [
            self.base_color,
            self.metallic_roughness,
            self.normal,
            self.occlusion,
            self.emissive,
        ];
        TextureSlot::ALL
            .into_iter()
            .zip(enabled)
            .filter_map(|(slot, enabled)| enabled.then_some(slot))
            .collect()
    }

    fn shader_name(&self) -> String {
        let mut name = format!("gltf_{:?}", self.blend).to_lowercase();
        if self.double_sided {
            name += "_double_sided";
        }
        for slot in self.slots() {
            name += &format!("_{slot:?}").to_lowercase();
        }
        name
    }
}

impl Default for MaterialKey {
    fn default() -> Self {
        Self {
            blend: BlendMode::Opaque,
            double_sided: false,
            base_color: false,
            metallic_roughness: false,
            normal: false,
            occlusion: false,
            emissive: false,
        }
    }
}

pub fn parameters_from_gltf(material: &gltf::Material) -> Parameters {
    let pbr = material.pbr_metallic_roughness();
    Parameters {
        base_color: pbr.base_color_factor().into(),
        emissive: material.emissive_factor().into(),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        alpha_cutoff: material.alpha_cutoff().unwrap_or(0.5),
        double_sided: material.double_sided(),
    }
}

pub fn create_provider(engine: &mut Engine, source: MaterialSource) -> Box<dyn MaterialProvider> {
    match source {
        MaterialSource::GenerateShaders => Box::new(ShaderGenerator::default()),
        MaterialSource::LoadUbershaders => Box::new(UbershaderLoader::preload(engine)),
    }
}

impl MaterialProvider for ShaderGenerator {
    fn get_material(&mut self, engine: &mut Engine, key: &MaterialKey) -> Material {
        *self.cache.entry(*key).or_insert_with(|| {
            firestorm::profile_method!(get_material);

            tracing::debug!("Generating shader for {key:?}");
            engine.create_material(MaterialDesc {
                name: key.shader_name(),
                blend: key.blend,
                double_sided: key.double_sided,
                slots: key.slots(),
                ubershader: false,
            })
        })
    }

    fn material_count(&self) -> usize {
        self.cache.len()
    }
}

impl Destroy<Engine> for ShaderGenerator {
    fn destroy_with(&mut self, engine: &mut Engine) {
        firestorm::profile_method!(destroy_with);

        self.cache
            .drain()
            .for_each(|(_, material)| engine.destroy_material(material));
    }
}

impl UbershaderLoader {
    const BLEND_MODES: [BlendMode; 3] = [BlendMode::Opaque, BlendMode::Masked, BlendMode::Transparent];

    pub fn preload(engine: &mut Engine) -> Self {
        firestorm::profile_method!(preload);

        let materials = Self::BLEND_MODES
            .into_iter()
            .map(|blend| (blend, Self::create_ubershader(engine, blend)))
            .collect();
        tracing::debug!("Preloaded {} ubershaders", Self::BLEND_MODES.len());
        Self { materials }
    }

    fn create_ubershader(engine: &mut Engine, blend: BlendMode) -> Material {
        engine.create_material(MaterialDesc {
            name: format!("ubershader_{blend:?}").to_lowercase(),
            blend,
            double_sided: true,
            slots: TextureSlot::ALL.to_vec(),
            ubershader: true,
        })
    }
}

impl MaterialProvider for UbershaderLoader {
    fn get_material(&mut self, engine: &mut Engine, key: &MaterialKey) -> Material {
        *self
            .materials
            .entry(key.blend)
            .or_insert_with(|| Self::create_ubershader(engine, key.blend))
    }

    fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Destroy<Engine> for UbershaderLoader {
    fn destroy_with(&mut self, engine: &mut Engine) {
        firestorm::profile_method!(destroy_with);

        self.materials
            .drain()
            .for_each(|(_, material)| engine.destroy_material(material));
    }
}
