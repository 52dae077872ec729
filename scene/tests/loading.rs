use std::{fs, path::PathBuf};

use renderer::{Backend, Engine, TextureSlot};
use scene::{
    AssetConfiguration, AssetLoader, Error, MaterialSource, Names, ResourceConfiguration,
    ResourceLoader,
};

fn fixtures() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn triangle_dir() -> PathBuf {
    fixtures().join("triangle")
}

fn resource_loader(base_path: PathBuf) -> ResourceLoader {
    ResourceLoader::new(ResourceConfiguration {
        base_path,
        recompute_bounding_boxes: false,
    })
}

// Copies the triangle fixture into a scratch directory, leaving out `skip`.
fn scratch_triangle(skip: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in ["scene.gltf", "scene.bin", "tex.png"] {
        if file != skip {
            fs::copy(triangle_dir().join(file), dir.path().join(file)).unwrap();
        }
    }
    dir
}

struct Harness {
    engine: Engine,
    names: Names,
    loader: AssetLoader,
}

impl Harness {
    fn new(material_source: MaterialSource) -> Self {
        let mut engine = Engine::create(Backend::Default);
        let loader = AssetLoader::create(&mut engine, AssetConfiguration { material_source });
        Self {
            engine,
            names: Names::new(),
            loader,
        }
    }

    fn load_json(&mut self, bytes: &[u8]) -> scene::Result<scene::Asset> {
        self.loader
            .create_asset_from_json(&mut self.engine, &mut self.names, bytes)
    }
}

// Wraps a JSON document, and optionally a binary chunk, into a GLB container.
fn glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
    let mut json = json.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut chunks = [
        (json.len() as u32).to_le_bytes().as_slice(),
        b"JSON",
        &json,
    ]
    .concat();
    if let Some(bin) = bin {
        let mut bin = bin.to_vec();
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
        chunks.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        chunks.extend_from_slice(b"BIN\0");
        chunks.extend_from_slice(&bin);
    }
    let total = 12 + chunks.len() as u32;
    [
        b"glTF".as_slice(),
        &2u32.to_le_bytes(),
        &total.to_le_bytes(),
        &chunks,
    ]
    .concat()
}

#[test]
fn textures_are_bound_only_after_resources_are_resolved() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();

    let instance = asset.material_instance(Some(0)).unwrap();
    assert!(!asset.resources_loaded());
    assert_eq!(h.engine.instance_texture(instance, TextureSlot::BaseColor), None);
    assert!(asset.renderables().is_empty());

    resource_loader(triangle_dir())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();

    let texture = h
        .engine
        .instance_texture(instance, TextureSlot::BaseColor)
        .expect("base color texture bound");
    assert_eq!(h.engine.texture_extent(texture), Some((2, 2)));
    assert_eq!(h.engine.texture_is_srgb(texture), Some(true));
    assert_eq!(asset.textures(), &[texture]);
    assert_eq!(asset.renderables().len(), 1);

    let triangle = h.names.entity("Triangle").unwrap();
    let renderable = h.engine.renderable(triangle).unwrap();
    assert_eq!(renderable.triangle_count(), 1);
    assert_eq!(renderable.primitives[0].vertices[1].position, glam::vec4(1., 0., 0., 1.));

    let bbox = asset.bounding_box();
    assert_eq!(bbox.min, glam::Vec3::ZERO);
    assert_eq!(bbox.max, glam::vec3(1., 1., 0.));

    let parameters = h.engine.parameters(instance).unwrap();
    assert!((parameters.roughness - 0.5).abs() < f32::EPSILON);
    assert!(parameters.metallic.abs() < f32::EPSILON);
}

#[test]
fn loading_resources_twice_is_a_no_op() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();
    let resources = resource_loader(triangle_dir());

    resources.load_resources(&mut h.engine, &mut asset).unwrap();
    resources.load_resources(&mut h.engine, &mut asset).unwrap();
    assert_eq!(h.engine.texture_count(), 1);
    assert_eq!(h.engine.renderable_count(), 1);
}

#[test]
fn missing_external_resource_is_reported() {
    let dir = scratch_triangle("tex.png");

    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(dir.path().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();

    let err = resource_loader(dir.path().to_owned())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap_err();
    assert!(matches!(err, Error::Gltf(_)), "unexpected error: {err}");
    assert!(asset.has_source_data());
    assert!(!asset.resources_loaded());
    assert_eq!(h.engine.texture_count(), 0);
}

#[test]
fn failed_resolve_can_be_retried_with_the_binary_chunk() {
    let dir = scratch_triangle("scene.bin");
    let json = fs::read_to_string(triangle_dir().join("scene.gltf")).unwrap();
    let external = r#"{
      "uri": "scene.bin",
      "byteLength": 136
    }"#;
    assert!(json.contains(external));
    let json = json.replace(
        external,
        r#"{ "byteLength": 136 }, { "uri": "extra.bin", "byteLength": 4 }"#,
    );
    let bin = fs::read(triangle_dir().join("scene.bin")).unwrap();
    let container = glb(json.as_bytes(), Some(&bin));

    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let mut asset = h
        .loader
        .create_asset_from_binary(&mut h.engine, &mut h.names, &container)
        .unwrap();
    let resources = resource_loader(dir.path().to_owned());

    assert!(matches!(
        resources.load_resources(&mut h.engine, &mut asset),
        Err(Error::Gltf(_))
    ));
    assert!(!asset.resources_loaded());

    fs::write(dir.path().join("extra.bin"), [0u8; 4]).unwrap();
    resources.load_resources(&mut h.engine, &mut asset).unwrap();
    assert!(asset.resources_loaded());
    assert_eq!(asset.renderables().len(), 1);
    assert_eq!(asset.textures().len(), 1);
}

#[test]
fn bounding_boxes_can_be_recomputed_from_positions() {
    let dir = scratch_triangle("scene.gltf");
    let json = fs::read_to_string(triangle_dir().join("scene.gltf")).unwrap();
    let declared = "\"max\": [\n        1,\n        1,\n        0\n      ]";
    assert!(json.contains(declared));
    fs::write(
        dir.path().join("scene.gltf"),
        json.replace(declared, r#""max": [4, 4, 4]"#),
    )
    .unwrap();
    let bytes = fs::read(dir.path().join("scene.gltf")).unwrap();

    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let mut declared_bounds = h.load_json(&bytes).unwrap();
    resource_loader(dir.path().to_owned())
        .load_resources(&mut h.engine, &mut declared_bounds)
        .unwrap();
    assert_eq!(declared_bounds.bounding_box().max, glam::vec3(4., 4., 4.));

    let mut recomputed = h.load_json(&bytes).unwrap();
    ResourceLoader::new(ResourceConfiguration {
        base_path: dir.path().to_owned(),
        recompute_bounding_boxes: true,
    })
    .load_resources(&mut h.engine, &mut recomputed)
    .unwrap();
    assert_eq!(recomputed.bounding_box().min, glam::Vec3::ZERO);
    assert_eq!(recomputed.bounding_box().max, glam::vec3(1., 1., 0.));
}

#[test]
fn embedded_resources_resolve_with_empty_base_path() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(fixtures().join("inline.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();

    resource_loader(PathBuf::new())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();
    assert_eq!(asset.textures().len(), 1);
    assert_eq!(asset.renderables().len(), 1);
}

#[test]
fn binary_container_goes_through_binary_entry_point() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let container = glb(&fs::read(fixtures().join("inline.gltf")).unwrap(), None);

    assert!(matches!(h.load_json(&container), Err(Error::Gltf(_))));

    let mut asset = h
        .loader
        .create_asset_from_binary(&mut h.engine, &mut h.names, &container)
        .unwrap();
    resource_loader(PathBuf::new())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();
    assert_eq!(asset.renderables().len(), 1);
}

#[test]
fn animator_survives_source_release() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();

    assert!(matches!(asset.animator(), Err(Error::ResourcesNotLoaded)));

    resource_loader(triangle_dir())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();
    let animator = asset.animator().unwrap();
    assert_eq!(animator.animation_count(), 1);
    assert!((animator.animation_duration(0) - 1.).abs() < f32::EPSILON);
    assert_eq!(animator.animation(0).unwrap().name.as_deref(), Some("Rise"));

    asset.release_source_data();
    assert!(!asset.has_source_data());
    assert!(asset.animator().is_ok());

    let triangle = h.names.entity("Triangle").unwrap();
    asset.apply_animation(&mut h.engine, 0, 0.5);
    let y = asset.node(triangle).unwrap().local.translation.y;
    assert!((y - 1.).abs() < 1e-5);

    // wraps around the one second duration
    asset.apply_animation(&mut h.engine, 0, 1.25);
    let y = h.engine.transform(triangle).w_axis.y;
    assert!((y - 0.5).abs() < 1e-5);
}

#[test]
fn animator_cannot_be_extracted_after_release() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();
    asset.release_source_data();
    assert!(matches!(asset.animator(), Err(Error::SourceReleased)));

    // applying without an animator is harmless
    asset.apply_animation(&mut h.engine, 0, 0.5);
}

#[test]
fn unit_cube_transform_fits_bounds() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();
    resource_loader(triangle_dir())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();

    asset.transform_to_unit_cube(&mut h.engine);
    let root = asset.root_transform();
    let max = root.transform_point3(asset.bounding_box().max);
    let min = root.transform_point3(asset.bounding_box().min);
    assert!((max - glam::vec3(1., 1., 0.)).length() < 1e-5);
    assert!((min - glam::vec3(-1., -1., 0.)).length() < 1e-5);
    assert_eq!(h.engine.transform(asset.root()), root);
}

#[test]
fn destroying_through_the_loader_releases_everything() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let mut asset = h.load_json(&bytes).unwrap();
    resource_loader(triangle_dir())
        .load_resources(&mut h.engine, &mut asset)
        .unwrap();
    assert_eq!(h.names.len(), 2);
    assert_eq!(h.loader.live_assets(), 1);

    h.loader.destroy_asset(&mut h.engine, &mut h.names, asset);
    assert_eq!(h.engine.renderable_count(), 0);
    assert_eq!(h.engine.material_instance_count(), 0);
    assert_eq!(h.engine.texture_count(), 0);
    assert!(h.engine.entities().is_empty());
    assert!(h.names.is_empty());
    assert_eq!(h.loader.live_assets(), 0);

    assert_eq!(h.loader.material_count(), 1);
    h.loader.destroy_materials(&mut h.engine);
    assert_eq!(h.engine.material_count(), 0);
}

#[test]
fn ubershader_mode_shares_preloaded_materials() {
    let mut h = Harness::new(MaterialSource::LoadUbershaders);
    assert_eq!(h.engine.material_count(), 3);

    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let asset = h.load_json(&bytes).unwrap();
    let instance = asset.material_instance(Some(0)).unwrap();
    let material = h.engine.instance_material(instance).unwrap();
    assert!(h.engine.material(material).unwrap().ubershader);
    assert_eq!(h.engine.material_count(), 3);

    h.loader.destroy_asset(&mut h.engine, &mut h.names, asset);
    h.loader.destroy_materials(&mut h.engine);
    assert_eq!(h.engine.material_count(), 0);
}

#[test]
#[should_panic(expected = "instances of it remain")]
fn materials_cannot_outlive_the_assets_using_them() {
    let mut h = Harness::new(MaterialSource::GenerateShaders);
    let bytes = fs::read(triangle_dir().join("scene.gltf")).unwrap();
    let _asset = h.load_json(&bytes).unwrap();

    h.loader.destroy_materials(&mut h.engine);
}
