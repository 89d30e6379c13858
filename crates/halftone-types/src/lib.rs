//! Shared layout contract between the host renderer and the halftone shader.
//!
//! Everything here is plain data. The WGSL side (`halftone.wgsl` in the
//! engine) declares the same structs and binding numbers; the two must agree
//! byte for byte. Layout is pinned by the compile-time assertions at the
//! bottom of this file.

use core::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};

/// Bind group holding every halftone resource.
pub const BIND_GROUP: u32 = 0;

/// Minimum alignment the uniform block is padded to.
pub const UNIFORM_ALIGNMENT: usize = 16;

/// Vertex-stage binding slots.
///
/// `Vertices` is the vertex buffer slot; `Uniforms` is the uniform buffer
/// binding inside [`BIND_GROUP`].
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexInputIndex {
    Vertices = 0,
    Uniforms = 1,
}

/// Fragment-stage texture binding slots.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureIndex {
    Screen = 0,
}

/// Sampler binding slots.
///
/// Shares the binding namespace of [`BIND_GROUP`] with the texture and the
/// uniform block, so numbering continues after them.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SamplerIndex {
    Screen = 2,
}

/// Shader `@location` of each [`Vertex`] field.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttributeIndex {
    Position = 0,
    TexCoord = 1,
}

/// One corner of the fullscreen quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Clip-space position.
    pub position: [f32; 2],
    /// Texture coordinate, 0..1, origin top-left.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    #[inline]
    pub const fn new(position: [f32; 2], tex_coord: [f32; 2]) -> Self {
        Self { position, tex_coord }
    }
}

/// Per-frame effect parameters.
///
/// Values are passed through untouched; range checks belong to whoever
/// produces them.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct HalftoneUniforms {
    /// Dot grid pitch in pixels.
    pub dot_size: f32,
    /// 0.0 = original image, 1.0 = fully halftoned.
    pub intensity: f32,
    /// Render target size in pixels.
    pub screen_size: [f32; 2],
}

impl HalftoneUniforms {
    #[inline]
    pub const fn new(dot_size: f32, intensity: f32, screen_size: [f32; 2]) -> Self {
        Self {
            dot_size,
            intensity,
            screen_size,
        }
    }
}

/// Fullscreen quad as a 4-vertex triangle strip.
pub const FULLSCREEN_QUAD_STRIP: [Vertex; 4] = [
    Vertex::new([-1.0, -1.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0], [1.0, 1.0]),
    Vertex::new([-1.0, 1.0], [0.0, 0.0]),
    Vertex::new([1.0, 1.0], [1.0, 0.0]),
];

/// Fullscreen quad as two triangles (triangle list), the form that is drawn.
pub const FULLSCREEN_QUAD: [Vertex; 6] = [
    Vertex::new([-1.0, -1.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0], [1.0, 1.0]),
    Vertex::new([-1.0, 1.0], [0.0, 0.0]),
    Vertex::new([1.0, -1.0], [1.0, 1.0]),
    Vertex::new([1.0, 1.0], [1.0, 0.0]),
    Vertex::new([-1.0, 1.0], [0.0, 0.0]),
];

// ── layout ────────────────────────────────────────────────────────────────

const _: () = assert!(size_of::<Vertex>() == 16, "Vertex must be 4 packed f32");
const _: () = assert!(offset_of!(Vertex, position) == 0);
const _: () = assert!(offset_of!(Vertex, tex_coord) == 8);
const _: () = assert!(align_of::<Vertex>() == 4);

const _: () = assert!(offset_of!(HalftoneUniforms, dot_size) == 0);
const _: () = assert!(offset_of!(HalftoneUniforms, intensity) == 4);
const _: () = assert!(offset_of!(HalftoneUniforms, screen_size) == 8);
const _: () = assert!(
    size_of::<HalftoneUniforms>() % UNIFORM_ALIGNMENT == 0,
    "HalftoneUniforms must fill whole 16-byte uniform rows"
);
