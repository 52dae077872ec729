use std::{borrow::Cow, collections::HashMap};

use gltf::{scene::Node as GltfNode, Document};

use renderer::{Engine, MaterialInstance, TextureSlot};

use crate::{
    asset::{Node, SourceData, TextureBinding},
    materials::{self, MaterialKey, MaterialProvider},
    Asset, BoundingBox, Names, Result, Transform,
};

pub fn parse_binary(bytes: &[u8]) -> Result<(Document, Option<Vec<u8>>)> {
    firestorm::profile_fn!(parse_binary);

    let glb = gltf::Glb::from_slice(bytes)?;
    let document = parse_document(&glb.json)?;
    Ok((document, glb.bin.map(Cow::into_owned)))
}

pub fn parse_json(bytes: &[u8]) -> Result<Document> {
    firestorm::profile_fn!(parse_json);

    parse_document(bytes)
}

fn parse_document(json: &[u8]) -> Result<Document> {
    let root = gltf::json::Root::from_slice(json).map_err(gltf::Error::Deserialize)?;
    Ok(Document::from_json(root)?)
}

// Creates the entity hierarchy and material instances for the default scene. Geometry
// and textures are left for the resource loader, which is the only step that touches buffers.
pub fn instantiate(
    engine: &mut Engine,
    names: &mut Names,
    materials: &mut dyn MaterialProvider,
    document: Document,
    blob: Option<Vec<u8>>,
) -> Asset {
    firestorm::profile_fn!(instantiate);

    let root = engine.entities_mut().create();
    let mut nodes: Vec<Node> = Vec::new();
    let mut node_slots = HashMap::new();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    match &scene {
        Some(scene) => scene.nodes().traverse(None, &mut |node, parent| {
            let entity = engine.entities_mut().create();
            if let Some(name) = node.name() {
                names.add(entity, name);
            }
            let local = Transform::from_gltf(node.transform());
            let world = parent.map_or(glam::Mat4::IDENTITY, |p: usize| nodes[p].world())
                * local.matrix();
            node_slots.insert(node.index(), nodes.len());
            nodes.push(Node {
                entity,
                parent,
                local,
                world,
                mesh: node.mesh().map(|mesh| mesh.index()),
            });
            nodes.len() - 1
        }),
        None => tracing::warn!("glTF contains no scenes, asset will be empty"),
    }

    // json material index -> material instance
    let mut instances = HashMap::new();
    let mut texture_bindings = Vec::new();
    let mut handle_material = |material: gltf::Material| {
        *instances.entry(material.index()).or_insert_with(|| {
            create_instance(engine, materials, &material, &mut texture_bindings)
        })
    };

    for mesh in nodes.iter().filter_map(|node| node.mesh) {
        if let Some(mesh) = document.meshes().nth(mesh) {
            mesh.primitives()
                .for_each(|primitive| _ = handle_material(primitive.material()));
        }
    }

    tracing::debug!(
        "Instantiated {} nodes, {} material instances, {} pending textures",
        nodes.len(),
        instances.len(),
        texture_bindings.len()
    );

    Asset {
        root,
        nodes,
        node_slots,
        instances,
        texture_bindings,
        textures: Vec::new(),
        renderables: Vec::new(),
        bounding_box: BoundingBox::default(),
        root_transform: glam::Mat4::IDENTITY,
        source: Some(SourceData {
            document,
            blob,
            buffers: None,
        }),
        animator: None,
        resources_loaded: false,
    }
}

fn create_instance(
    engine: &mut Engine,
    materials: &mut dyn MaterialProvider,
    material: &gltf::Material,
    texture_bindings: &mut Vec<TextureBinding>,
) -> MaterialInstance {
    let key = MaterialKey::from_gltf(material);
    let base = materials.get_material(engine, &key);
    let name = material.name().map_or_else(
        || material.index().map_or("default".to_owned(), |i| format!("material#{i}")),
        ToOwned::to_owned,
    );
    let instance = engine.create_material_instance(base, name);
    engine.set_parameters(instance, materials::parameters_from_gltf(material));

    let pbr = material.pbr_metallic_roughness();
    let textures = [
        (TextureSlot::BaseColor, pbr.base_color_texture().map(|t| t.texture())),
        (
            TextureSlot::MetallicRoughness,
            pbr.metallic_roughness_texture().map(|t| t.texture()),
        ),
        (TextureSlot::Normal, material.normal_texture().map(|t| t.texture())),
        (TextureSlot::Occlusion, material.occlusion_texture().map(|t| t.texture())),
        (TextureSlot::Emissive, material.emissive_texture().map(|t| t.texture())),
    ];
    texture_bindings.extend(textures.into_iter().filter_map(|(slot, texture)| {
        texture.map(|texture| TextureBinding {
            instance,
            slot,
            texture: texture.index(),
        })
    }));

    instance
}

trait Traversable {
    fn traverse(self, parent: Option<usize>, f: &mut impl FnMut(&GltfNode<'_>, Option<usize>) -> usize);
}

impl Traversable for GltfNode<'_> {
    fn traverse(self, parent: Option<usize>, f: &mut impl FnMut(&GltfNode<'_>, Option<usize>) -> usize) {
        let slot = f(&self, parent);
        self.children().traverse(Some(slot), f);
    }
}

macro_rules! impl_traversable {
    ($t:ty) => {
        impl Traversable for $t {
            fn traverse(
                self,
                parent: Option<usize>,
                f: &mut impl FnMut(&GltfNode<'_>, Option<usize>) -> usize,
            ) {
                self.for_each(|elem| elem.traverse(parent, f));
            }
        }
    };
}
impl_traversable!(gltf::scene::iter::Nodes<'_>);
impl_traversable!(gltf::scene::iter::Children<'_>);
