use std::collections::{HashMap, HashSet};

use crate::{
    material::InstanceData, sync_state::SyncState, texture::TextureData, Backend, Entity,
    EntityManager, Fence, Material, MaterialDesc, MaterialInstance, Parameters, Renderable, Scene,
    Texture, TextureSlot, View,
};

// Headless engine: owns every GPU-visible resource handle and the frames that reference
// them, so lifetimes can be enforced without a device behind it.
pub struct Engine {
    backend: Backend,
    entities: EntityManager,
    materials: HashMap<Material, MaterialDesc>,
    instances: HashMap<MaterialInstance, InstanceData>,
    textures: HashMap<Texture, TextureData>,
    renderables: HashMap<Entity, Renderable>,
    transforms: HashMap<Entity, glam::Mat4>,
    fences: HashSet<u32>,
    next_handle: u32,
    state: SyncState,
}

impl Engine {
    pub fn create(backend: Backend) -> Self {
        firestorm::profile_method!(create);

        tracing::info!("Created headless engine ({backend:?} backend)");

        Self {
            backend,
            entities: EntityManager::default(),
            materials: HashMap::new(),
            instances: HashMap::new(),
            textures: HashMap::new(),
            renderables: HashMap::new(),
            transforms: HashMap::new(),
            fences: HashSet::new(),
            next_handle: 0,
            state: SyncState::default(),
        }
    }

    pub const fn backend(&self) -> Backend {
        self.backend
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    pub const fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn destroy_entity(&mut self, entity: Entity) {
        assert!(
            !self.renderables.contains_key(&entity),
            "Entity {} destroyed before its renderable",
            entity.id()
        );
        self.transforms.remove(&entity);
        self.entities.destroy(entity);
    }

    // materials

    pub fn create_material(&mut self, desc: MaterialDesc) -> Material {
        firestorm::profile_method!(create_material);

        let material = Material(self.next_handle());
        tracing::debug!("Created material '{}'", desc.name);
        self.materials.insert(material, desc);
        material
    }

    pub fn material(&self, material: Material) -> Option<&MaterialDesc> {
        self.materials.get(&material)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn destroy_material(&mut self, material: Material) {
        assert!(
            !self.instances.values().any(|i| i.material == material),
            "Material destroyed while instances of it remain"
        );
        let desc = self
            .materials
            .remove(&material)
            .expect("Destroying unknown material");
        tracing::debug!("Destroyed material '{}'", desc.name);
    }

    pub fn create_material_instance(
        &mut self,
        material: Material,
        name: impl AsRef<str>,
    ) -> MaterialInstance {
        assert!(
            self.materials.contains_key(&material),
            "Instancing unknown material"
        );
        let instance = MaterialInstance(self.next_handle());
        tracing::trace!("Instanced material as '{}'", name.as_ref());
        self.instances.insert(
            instance,
            InstanceData {
                material,
                parameters: Parameters::default(),
                textures: [None; TextureSlot::COUNT],
            },
        );
        instance
    }

    fn instance_mut(&mut self, instance: MaterialInstance) -> &mut InstanceData {
        self.instances
            .get_mut(&instance)
            .expect("Using unknown material instance")
    }

    pub fn set_parameters(&mut self, instance: MaterialInstance, parameters: Parameters) {
        self.instance_mut(instance).parameters = parameters;
    }

    pub fn set_texture(&mut self, instance: MaterialInstance, slot: TextureSlot, texture: Texture) {
        assert!(
            self.textures.contains_key(&texture),
            "Binding unknown texture"
        );
        self.instance_mut(instance).textures[slot as usize] = Some(texture);
    }

    pub fn parameters(&self, instance: MaterialInstance) -> Option<Parameters> {
        self.instances.get(&instance).map(|i| i.parameters)
    }

    pub fn instance_texture(&self, instance: MaterialInstance, slot: TextureSlot) -> Option<Texture> {
        self.instances.get(&instance).and_then(|i| i.texture(slot))
    }

    pub fn instance_material(&self, instance: MaterialInstance) -> Option<Material> {
        self.instances.get(&instance).map(|i| i.material)
    }

    pub fn material_instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn destroy_material_instance(&mut self, instance: MaterialInstance) {
        assert!(
            !self.in_flight_instances().contains(&instance),
            "Material instance destroyed while in flight"
        );
        self.instances
            .remove(&instance)
            .expect("Destroying unknown material instance");
    }

    // textures

    pub fn create_texture(
        &mut self,
        name: impl AsRef<str>,
        image: &image::RgbaImage,
        srgb: bool,
    ) -> Texture {
        firestorm::profile_method!(create_texture);

        let texture = Texture(self.next_handle());
        let data = TextureData::from_image(name, image, srgb);
        tracing::debug!(
            "Created texture '{}' ({}x{}, {} bytes)",
            data.name,
            data.extent.0,
            data.extent.1,
            data.size()
        );
        self.textures.insert(texture, data);
        texture
    }

    pub fn texture_extent(&self, texture: Texture) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| t.extent)
    }

    pub fn texture_is_srgb(&self, texture: Texture) -> Option<bool> {
        self.textures.get(&texture).map(|t| t.srgb)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn destroy_texture(&mut self, texture: Texture) {
        assert!(
            !self
                .in_flight_instances()
                .iter()
                .filter_map(|i| self.instances.get(i))
                .any(|i| i.uses_texture(texture)),
            "Texture destroyed while in flight"
        );
        self.textures
            .remove(&texture)
            .expect("Destroying unknown texture");
    }

    // renderables

    pub fn create_renderable(&mut self, entity: Entity, renderable: Renderable) {
        firestorm::profile_method!(create_renderable);

        assert!(
            self.entities.is_alive(entity),
            "Renderable attached to dead entity"
        );
        assert!(
            renderable.instances().all(|i| self.instances.contains_key(&i)),
            "Renderable references unknown material instance"
        );
        tracing::trace!(
            "Created renderable for entity {} ({} triangles)",
            entity.id(),
            renderable.triangle_count()
        );
        self.renderables.insert(entity, renderable);
    }

    pub fn renderable(&self, entity: Entity) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    pub fn destroy_renderable(&mut self, entity: Entity) {
        assert!(
            !self.state.is_in_flight(entity),
            "Renderable {} destroyed while in flight",
            entity.id()
        );
        self.renderables.remove(&entity);
    }

    pub fn set_transform(&mut self, entity: Entity, transform: glam::Mat4) {
        self.transforms.insert(entity, transform);
    }

    pub fn transform(&self, entity: Entity) -> glam::Mat4 {
        self.transforms
            .get(&entity)
            .copied()
            .unwrap_or(glam::Mat4::IDENTITY)
    }

    // frames

    pub fn render(&mut self, view: &View, scene: &Scene) -> u64 {
        firestorm::profile_method!(render);

        let entities = scene
            .entities()
            .iter()
            .copied()
            .filter(|e| self.renderables.contains_key(e))
            .collect::<HashSet<_>>();
        let count = entities.len();
        let frame = self.state.submit(entities);

        tracing::trace!(
            "Submitted frame {frame} ({count} renderables, {}x MSAA, {}x{})",
            view.sample_count(),
            view.viewport().0,
            view.viewport().1
        );
        frame
    }

    pub fn in_flight_frames(&self) -> usize {
        self.state.in_flight()
    }

    fn in_flight_instances(&self) -> HashSet<MaterialInstance> {
        self.state
            .in_flight_entities()
            .filter_map(|e| self.renderables.get(&e))
            .flat_map(Renderable::instances)
            .collect()
    }

    pub fn create_fence(&mut self) -> Fence {
        let fence = Fence {
            id: self.next_handle(),
            frame: self.state.submitted(),
        };
        self.fences.insert(fence.id);
        fence
    }

    pub fn wait_for_fence(&mut self, fence: &Fence) {
        firestorm::profile_method!(wait_for_fence);

        assert!(self.fences.contains(&fence.id), "Waiting on destroyed fence");
        self.state.retire_until(fence.frame);
        tracing::debug!("Fence signalled, frames up to {} retired", self.state.retired());
    }

    pub fn destroy_fence(&mut self, fence: Fence) {
        self.fences.remove(&fence.id);
    }

    pub fn flush_and_wait(&mut self) {
        let fence = self.create_fence();
        Fence::wait_and_destroy(self, fence);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        firestorm::profile_method!(drop);

        self.flush_and_wait();

        let leaked = self.renderables.len()
            + self.instances.len()
            + self.materials.len()
            + self.textures.len();
        if leaked > 0 {
            tracing::warn!(
                "Engine dropped with {} renderables, {} material instances, {} materials and {} textures alive",
                self.renderables.len(),
                self.instances.len(),
                self.materials.len(),
                self.textures.len()
            );
        }
    }
}
