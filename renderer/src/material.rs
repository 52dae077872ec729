use crate::Texture;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Material(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialInstance(pub(crate) u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Opaque,
    Masked,
    Transparent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    BaseColor,
    MetallicRoughness,
    Normal,
    Occlusion,
    Emissive,
}

impl TextureSlot {
    pub const COUNT: usize = 5;
    pub const ALL: [Self; Self::COUNT] = [
        Self::BaseColor,
        Self::MetallicRoughness,
        Self::Normal,
        Self::Occlusion,
        Self::Emissive,
    ];

    pub const fn is_srgb(self) -> bool {
        matches!(self, Self::BaseColor | Self::Emissive)
    }
}

// A specialized material samples exactly the slots it was generated for, an ubershader
// samples every slot and branches at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialDesc {
    pub name: String,
    pub blend: BlendMode,
    pub double_sided: bool,
    pub slots: Vec<TextureSlot>,
    pub ubershader: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    pub base_color: glam::Vec4,
    pub emissive: glam::Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            base_color: glam::Vec4::ONE,
            emissive: glam::Vec3::ZERO,
            metallic: 1.,
            roughness: 1.,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}

pub(crate) struct InstanceData {
    pub material: Material,
    pub parameters: Parameters,
    pub textures: [Option<Texture>; TextureSlot::COUNT],
}

impl InstanceData {
    pub fn texture(&self, slot: TextureSlot) -> Option<Texture> {
        self.textures[slot as usize]
    }

    pub fn uses_texture(&self, texture: Texture) -> bool {
        self.textures.contains(&Some(texture))
    }
}
