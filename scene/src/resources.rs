use std::{collections::HashMap, path::PathBuf};

use gltf::{buffer, image::Format, mesh};

use renderer::{Engine, Geometry, Renderable, Texture, Vertex};

use crate::{asset::SourceData, error::Error, Asset, BoundingBox, Result};

#[derive(Clone, Debug, Default)]
pub struct ResourceConfiguration {
    pub base_path: PathBuf,
    pub recompute_bounding_boxes: bool,
}

pub struct ResourceLoader {
    config: ResourceConfiguration,
}

impl ResourceLoader {
    pub const fn new(config: ResourceConfiguration) -> Self {
        Self { config }
    }

    pub fn load_resources(&self, engine: &mut Engine, asset: &mut Asset) -> Result<()> {
        firestorm::profile_method!(load_resources);

        if asset.resources_loaded {
            tracing::debug!("Resources already loaded, skipping");
            return Ok(());
        }

        let mut source = asset.source.take().ok_or(Error::SourceReleased)?;
        let result = self.resolve(engine, asset, &mut source);
        asset.source = Some(source);
        result?;

        asset.resources_loaded = true;
        asset.update_transforms(engine);

        tracing::info!(
            "Loaded resources: {} textures, {} renderables",
            asset.textures.len(),
            asset.renderables.len()
        );
        Ok(())
    }

    fn resolve(
        &self,
        engine: &mut Engine,
        asset: &mut Asset,
        source: &mut SourceData,
    ) -> Result<()> {
        if source.buffers.is_none() {
            source.buffers = Some(self.load_buffers(&source.document, source.blob.as_deref())?);
            // the binary chunk now lives in the resolved buffers
            source.blob = None;
        }
        let buffers = source.buffers.as_deref().unwrap_or_default();
        self.load_textures(engine, asset, &source.document, buffers)?;
        self.create_renderables(engine, asset, &source.document, buffers);
        Ok(())
    }

    // The blob is copied into the import so a failed resolve can be retried.
    fn load_buffers(
        &self,
        document: &gltf::Document,
        blob: Option<&[u8]>,
    ) -> Result<Vec<buffer::Data>> {
        firestorm::profile_method!(load_buffers);

        let buffers =
            gltf::import_buffers(document, Some(&self.config.base_path), blob.map(<[u8]>::to_vec))?;
        tracing::trace!(
            "Resolved {} buffers ({} bytes)",
            buffers.len(),
            buffers.iter().map(|b| b.len()).sum::<usize>()
        );
        Ok(buffers)
    }

    fn load_textures(
        &self,
        engine: &mut Engine,
        asset: &mut Asset,
        document: &gltf::Document,
        buffers: &[buffer::Data],
    ) -> Result<()> {
        firestorm::profile_method!(load_textures);

        if asset.texture_bindings.is_empty() {
            return Ok(());
        }
        let images = gltf::import_images(document, Some(&self.config.base_path), buffers)?;

        // (json image index, srgb) -> created texture
        let mut processed_images: HashMap<(usize, bool), Texture> = HashMap::new();

        for binding in &asset.texture_bindings {
            let Some(gltf_texture) = document.textures().nth(binding.texture) else {
                tracing::warn!("Material refers to missing texture {}", binding.texture);
                continue;
            };
            let image = gltf_texture.source();
            let srgb = binding.slot.is_srgb();

            let texture = match processed_images.get(&(image.index(), srgb)) {
                Some(&texture) => texture,
                None => {
                    let decoded = to_rgba(image.index(), &images[image.index()])?;
                    let name = image
                        .name()
                        .map_or_else(|| format!("image#{}", image.index()), ToOwned::to_owned);
                    let texture = engine.create_texture(name, &decoded, srgb);
                    processed_images.insert((image.index(), srgb), texture);
                    asset.textures.push(texture);
                    texture
                }
            };
            engine.set_texture(binding.instance, binding.slot, texture);
        }

        Ok(())
    }

    fn create_renderables(
        &self,
        engine: &mut Engine,
        asset: &mut Asset,
        document: &gltf::Document,
        buffers: &[buffer::Data],
    ) {
        firestorm::profile_method!(create_renderables);

        let mut bounding_box = BoundingBox::default();

        for node in &asset.nodes {
            let Some(mesh) = node.mesh.and_then(|mesh| document.meshes().nth(mesh)) else {
                continue;
            };

            let mut renderable = Renderable::default();
            let mut mesh_bounds = BoundingBox::default();
            for primitive in mesh.primitives() {
                let Some(instance) = asset.instances.get(&primitive.material().index()).copied() else {
                    continue;
                };
                let Some((geometry, bounds)) =
                    self.read_primitive(&primitive, buffers, instance)
                else {
                    continue;
                };
                mesh_bounds = mesh_bounds.union(bounds);
                renderable.primitives.push(geometry);
            }

            if renderable.primitives.is_empty() {
                continue;
            }
            bounding_box = bounding_box.union(mesh_bounds.transform(node.world));
            engine.create_renderable(node.entity, renderable);
            asset.renderables.push(node.entity);
        }

        asset.bounding_box = bounding_box;
    }

    fn read_primitive(
        &self,
        primitive: &mesh::Primitive,
        buffers: &[buffer::Data],
        instance: renderer::MaterialInstance,
    ) -> Option<(Geometry, BoundingBox)> {
        if primitive.mode() != mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} with unsupported mode {:?}",
                primitive.index(),
                primitive.mode()
            );
            return None;
        }

        let reader =
            primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let Some(positions) = reader.read_positions() else {
            tracing::warn!("Skipping primitive {} without positions", primitive.index());
            return None;
        };
        let positions = positions.collect::<Vec<_>>();

        let normals = reader.read_normals().map_or_else(
            || Box::new(std::iter::repeat_with(Default::default)) as Box<_>,
            |nn| Box::new(nn) as Box<dyn Iterator<Item = [f32; 3]>>,
        );
        let tex_coords0 = reader
            .read_tex_coords(0)
            .map(mesh::util::ReadTexCoords::into_f32)
            .map_or_else(
                || Box::new(std::iter::repeat_with(Default::default)) as Box<_>,
                |uv| Box::new(uv) as Box<dyn Iterator<Item = [f32; 2]>>,
            );
        let tex_coords1 = reader
            .read_tex_coords(1)
            .map(mesh::util::ReadTexCoords::into_f32)
            .map_or_else(
                || Box::new(std::iter::repeat_with(Default::default)) as Box<_>,
                |uv| Box::new(uv) as Box<dyn Iterator<Item = [f32; 2]>>,
            );

        let bounds = if self.config.recompute_bounding_boxes {
            BoundingBox::from_points(positions.iter().copied().map(glam::Vec3::from))
        } else {
            let bbox = primitive.bounding_box();
            BoundingBox::new(bbox.min, bbox.max)
        };

        let vertices = positions
            .iter()
            .copied()
            .zip(normals)
            .zip(tex_coords0)
            .zip(tex_coords1)
            .map(Vertex::from)
            .collect::<Vec<_>>();

        let indices = reader.read_indices().map_or_else(
            || (0..vertices.len() as u32).collect(),
            |indices| indices.into_u32().collect(),
        );

        Some((
            Geometry {
                vertices,
                indices,
                instance,
            },
            bounds,
        ))
    }
}

// Widens whatever layout the decoder produced to 8-bit RGBA.
fn to_rgba(index: usize, data: &gltf::image::Data) -> Result<image::RgbaImage> {
    use image::{DynamicImage, ImageBuffer};

    let (width, height) = (data.width, data.height);
    let decoded = match data.format {
        Format::R8 => {
            ImageBuffer::from_raw(width, height, data.pixels.clone()).map(DynamicImage::ImageLuma8)
        }
        Format::R8G8 => {
            ImageBuffer::from_raw(width, height, data.pixels.clone()).map(DynamicImage::ImageLumaA8)
        }
        Format::R8G8B8 => {
            ImageBuffer::from_raw(width, height, data.pixels.clone()).map(DynamicImage::ImageRgb8)
        }
        Format::R8G8B8A8 => {
            ImageBuffer::from_raw(width, height, data.pixels.clone()).map(DynamicImage::ImageRgba8)
        }
        Format::R16 => {
            ImageBuffer::from_raw(width, height, words(&data.pixels)).map(DynamicImage::ImageLuma16)
        }
        Format::R16G16 => {
            ImageBuffer::from_raw(width, height, words(&data.pixels)).map(DynamicImage::ImageLumaA16)
        }
        Format::R16G16B16 => {
            ImageBuffer::from_raw(width, height, words(&data.pixels)).map(DynamicImage::ImageRgb16)
        }
        Format::R16G16B16A16 => {
            ImageBuffer::from_raw(width, height, words(&data.pixels)).map(DynamicImage::ImageRgba16)
        }
        Format::R32G32B32FLOAT => {
            ImageBuffer::from_raw(width, height, floats(&data.pixels)).map(DynamicImage::ImageRgb32F)
        }
        Format::R32G32B32A32FLOAT => {
            ImageBuffer::from_raw(width, height, floats(&data.pixels)).map(DynamicImage::ImageRgba32F)
        }
    };
    decoded
        .map(DynamicImage::into_rgba8)
        .ok_or(Error::ImageData { index })
}

fn words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
