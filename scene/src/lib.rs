pub mod animator;
mod asset;
mod error;
pub mod loader;
pub mod materials;
mod names;
mod parser;
pub mod resources;

pub use {
    animator::Animator,
    asset::{Asset, Node},
    error::{Error, Result},
    loader::{AssetConfiguration, AssetLoader},
    materials::MaterialSource,
    names::Names,
    resources::{ResourceConfiguration, ResourceLoader},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: glam::Vec3,
    pub rotation: glam::Quat,
    pub scale: glam::Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: glam::Vec3,
    pub max: glam::Vec3,
}

impl Transform {
    pub fn from_gltf(transform: gltf::scene::Transform) -> Self {
        let (translation, rotation, scale) = transform.decomposed();
        Self {
            translation: translation.into(),
            rotation: glam::Quat::from_array(rotation),
            scale: scale.into(),
        }
    }

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: glam::Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: glam::Vec3::ONE,
        }
    }
}

impl BoundingBox {
    pub fn new<T: Into<glam::Vec3>>(min: T, max: T) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = glam::Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::default(), |bbox, p| Self::new(bbox.min.min(p), bbox.max.max(p)))
    }

    pub fn transform(self, transform: glam::Mat4) -> Self {
        if self.is_empty() {
            return self;
        }
        Self::from_points((0..8).map(|corner| {
            let pick = |bit, lo: f32, hi: f32| if corner & bit == 0 { lo } else { hi };
            transform.transform_point3(glam::vec3(
                pick(1, self.min.x, self.max.x),
                pick(2, self.min.y, self.max.y),
                pick(4, self.min.z, self.max.z),
            ))
        }))
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn center(&self) -> glam::Vec3 {
        (self.min + self.max) / 2.
    }

    pub fn size(&self) -> glam::Vec3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(glam::Vec3::INFINITY, glam::Vec3::NEG_INFINITY)
    }
}
