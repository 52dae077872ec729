mod engine;
pub mod entity;
mod fence;
pub mod material;
pub mod renderable;
mod scene;
mod sync_state;
pub mod texture;
mod view;

use std::{ops::DerefMut, str::FromStr};

pub use {
    engine::Engine,
    entity::{Entity, EntityManager},
    fence::Fence,
    material::{BlendMode, Material, MaterialDesc, MaterialInstance, Parameters, TextureSlot},
    renderable::{Geometry, Renderable, Vertex},
    scene::Scene,
    texture::Texture,
    view::View,
};

pub mod conf {
    pub const MAX_FRAMES_IN_FLIGHT: usize = 2;
    pub const DEFAULT_SAMPLE_COUNT: u8 = 1;
}

pub trait Destroy<C> {
    fn destroy_with(&mut self, ctx: &mut C);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Default,
    OpenGl,
    Vulkan,
    Metal,
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized backend '{0}', must be 'opengl'|'vulkan'|'metal'")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opengl" => Ok(Self::OpenGl),
            "vulkan" => Ok(Self::Vulkan),
            "metal" => Ok(Self::Metal),
            _ => Err(UnknownBackend(s.to_owned())),
        }
    }
}

impl<T: Destroy<C>, C> Destroy<C> for Vec<T> {
    fn destroy_with(&mut self, ctx: &mut C) {
        self.iter_mut().for_each(|e| e.destroy_with(ctx));
    }
}

impl<T: Destroy<C> + ?Sized, C> Destroy<C> for Box<T> {
    fn destroy_with(&mut self, ctx: &mut C) {
        self.deref_mut().destroy_with(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_backends() {
        assert_eq!("opengl".parse::<Backend>().ok(), Some(Backend::OpenGl));
        assert_eq!("vulkan".parse::<Backend>().ok(), Some(Backend::Vulkan));
        assert_eq!("metal".parse::<Backend>().ok(), Some(Backend::Metal));
    }

    #[test]
    fn backend_names_are_case_sensitive() {
        assert!("OpenGL".parse::<Backend>().is_err());
        assert!("quantum".parse::<Backend>().is_err());
    }
}
