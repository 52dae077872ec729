use std::collections::HashMap;

use renderer::{Engine, Entity, MaterialInstance, Texture, TextureSlot};

use crate::{animator::Animator, error::Error, BoundingBox, Result, Transform};

pub struct Node {
    pub entity: Entity,
    pub parent: Option<usize>,
    pub local: Transform,
    pub(crate) world: glam::Mat4,
    pub(crate) mesh: Option<usize>,
}

// Texture reference recorded at parse time, bound once the image has been decoded.
pub(crate) struct TextureBinding {
    pub instance: MaterialInstance,
    pub slot: TextureSlot,
    pub texture: usize,
}

// Everything borrowed from the glTF file itself. Dropped by `release_source_data`.
pub(crate) struct SourceData {
    pub document: gltf::Document,
    pub blob: Option<Vec<u8>>,
    pub buffers: Option<Vec<gltf::buffer::Data>>,
}

pub struct Asset {
    pub(crate) root: Entity,
    pub(crate) nodes: Vec<Node>,
    pub(crate) node_slots: HashMap<usize, usize>,
    pub(crate) instances: HashMap<Option<usize>, MaterialInstance>,
    pub(crate) texture_bindings: Vec<TextureBinding>,
    pub(crate) textures: Vec<Texture>,
    pub(crate) renderables: Vec<Entity>,
    pub(crate) bounding_box: BoundingBox,
    pub(crate) root_transform: glam::Mat4,
    pub(crate) source: Option<SourceData>,
    pub(crate) animator: Option<Animator>,
    pub(crate) resources_loaded: bool,
}

impl Node {
    pub const fn world(&self) -> glam::Mat4 {
        self.world
    }
}

impl Asset {
    pub const fn root(&self) -> Entity {
        self.root
    }

    pub fn entities(&self) -> Vec<Entity> {
        std::iter::once(self.root)
            .chain(self.nodes.iter().map(|node| node.entity))
            .collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, entity: Entity) -> Option<&Node> {
        self.nodes.iter().find(|node| node.entity == entity)
    }

    pub fn renderables(&self) -> &[Entity] {
        &self.renderables
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    // `None` is the default instance used by primitives without a material.
    pub fn material_instance(&self, gltf_material: Option<usize>) -> Option<MaterialInstance> {
        self.instances.get(&gltf_material).copied()
    }

    pub const fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub const fn root_transform(&self) -> glam::Mat4 {
        self.root_transform
    }

    pub const fn resources_loaded(&self) -> bool {
        self.resources_loaded
    }

    pub const fn has_source_data(&self) -> bool {
        self.source.is_some()
    }

    pub fn animator(&mut self) -> Result<&Animator> {
        if self.animator.is_none() {
            firestorm::profile_method!(animator);

            let source = self.source.as_ref().ok_or(Error::SourceReleased)?;
            let buffers = source
                .buffers
                .as_deref()
                .filter(|_| self.resources_loaded)
                .ok_or(Error::ResourcesNotLoaded)?;
            let animator = Animator::from_source(&source.document, buffers, &self.node_slots);
            tracing::debug!("Extracted {} animations", animator.animation_count());
            self.animator = Some(animator);
        }
        self.animator.as_ref().ok_or(Error::SourceReleased)
    }

    pub fn has_animator(&self) -> bool {
        self.animator.is_some()
    }

    pub fn release_source_data(&mut self) {
        if self.source.take().is_some() {
            tracing::debug!("Released glTF source data");
        }
    }

    pub fn apply_animation(&mut self, engine: &mut Engine, index: usize, time: f64) {
        let Some(animator) = &self.animator else {
            return;
        };
        if animator.apply(index, time, &mut self.nodes) {
            self.update_transforms(engine);
        }
    }

    pub fn transform_to_unit_cube(&mut self, engine: &mut Engine) {
        if self.bounding_box.is_empty() {
            return;
        }
        let center = self.bounding_box.center();
        let max_extent = self.bounding_box.size().max_element();
        let scale = if max_extent > 0. { 2. / max_extent } else { 1. };
        self.root_transform =
            glam::Mat4::from_scale(glam::Vec3::splat(scale)) * glam::Mat4::from_translation(-center);
        self.update_transforms(engine);
    }

    // Nodes are stored parents first, so a single pass resolves every world transform.
    pub fn update_transforms(&mut self, engine: &mut Engine) {
        engine.set_transform(self.root, self.root_transform);
        for i in 0..self.nodes.len() {
            let parent = self.nodes[i]
                .parent
                .map_or(glam::Mat4::IDENTITY, |p| self.nodes[p].world);
            let node = &mut self.nodes[i];
            node.world = parent * node.local.matrix();
            engine.set_transform(node.entity, self.root_transform * node.world);
        }
    }
}
