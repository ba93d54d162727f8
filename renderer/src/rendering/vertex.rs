use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::rendering::limits::FLOATS_PER_VERTEX;

/// One sprite vertex as laid out in the GPU vertex buffer: 5 floats, 20 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// Pixel position, z is always 0
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

const _: () = assert!(size_of::<SpriteVertex>() == FLOATS_PER_VERTEX * size_of::<f32>());

impl SpriteVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn new(position: Vec2, tex_coord: Vec2) -> Self {
        SpriteVertex {
            position: [position.x, position.y, 0.0],
            tex_coord: tex_coord.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
