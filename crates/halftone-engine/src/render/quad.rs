//! Vertex buffer layout for the fullscreen quad.

use crate::types::{FULLSCREEN_QUAD, Vertex, VertexAttributeIndex};

const ATTRS: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: std::mem::offset_of!(Vertex, position) as u64,
        shader_location: VertexAttributeIndex::Position as u32,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: std::mem::offset_of!(Vertex, tex_coord) as u64,
        shader_location: VertexAttributeIndex::TexCoord as u32,
    },
];

/// Number of vertices drawn per frame (two triangles).
pub const QUAD_VERTEX_COUNT: u32 = FULLSCREEN_QUAD.len() as u32;

/// Layout of a buffer holding [`Vertex`] values.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}
