use bytemuck::{Pod, Zeroable};

use crate::MaterialInstance;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: glam::Vec4,
    pub normal: glam::Vec4,
    pub tex_coords: glam::Vec4,
}

pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub instance: MaterialInstance,
}

#[derive(Default)]
pub struct Renderable {
    pub primitives: Vec<Geometry>,
}

impl Vertex {
    pub fn new(position: &[f32], normal: &[f32], tex_coord0: &[f32], tex_coord1: &[f32]) -> Self {
        Self {
            position: glam::Vec3::from_slice(position).extend(1.0),
            normal: glam::Vec3::from_slice(normal).extend(0.0),
            tex_coords: glam::Vec4::new(tex_coord0[0], tex_coord0[1], tex_coord1[0], tex_coord1[1]),
        }
    }
}

type RawData = ((([f32; 3], [f32; 3]), [f32; 2]), [f32; 2]); // (((position, normal), uv0), uv1)
impl From<RawData> for Vertex {
    fn from((((position, normal), tex_coord0), tex_coord1): RawData) -> Self {
        Self::new(&position, &normal, &tex_coord0, &tex_coord1)
    }
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn size(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice()) + std::mem::size_of_val(self.indices.as_slice())
    }
}

impl Renderable {
    pub fn instances(&self) -> impl Iterator<Item = MaterialInstance> + '_ {
        self.primitives.iter().map(|primitive| primitive.instance)
    }

    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(Geometry::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_packs_both_uv_sets() {
        let vertex = Vertex::from(((([1., 2., 3.], [0., 0., 1.]), [0.25, 0.5]), [0.75, 1.]));
        assert_eq!(vertex.position, glam::vec4(1., 2., 3., 1.));
        assert_eq!(vertex.normal, glam::vec4(0., 0., 1., 0.));
        assert_eq!(vertex.tex_coords, glam::vec4(0.25, 0.5, 0.75, 1.));
        assert_eq!(bytemuck::bytes_of(&vertex).len(), 48);
    }
}
