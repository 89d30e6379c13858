use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::capture::CapturedFrame;
use crate::types::{
    BIND_GROUP, FULLSCREEN_QUAD, HalftoneUniforms, SamplerIndex, TextureIndex, VertexInputIndex,
};

use super::quad::{vertex_layout, QUAD_VERTEX_COUNT};
use super::{RenderCtx, RenderTarget};

pub(crate) const SHADER_SRC: &str = include_str!("shaders/halftone.wgsl");

/// Fullscreen halftone pass.
///
/// Resources are created lazily on first use and the pipeline is rebuilt if
/// the surface format changes. The screen texture is (re)allocated whenever a
/// frame of a different size arrives.
#[derive(Default)]
pub struct HalftoneRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
    uniform_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,

    screen: Option<ScreenTexture>,
    uniforms: HalftoneUniforms,
}

struct ScreenTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
    format: wgpu::TextureFormat,
}

impl HalftoneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a screen frame has been uploaded.
    pub fn has_texture(&self) -> bool {
        self.screen.is_some()
    }

    /// Size of the current screen texture in pixels.
    pub fn texture_size(&self) -> Option<(u32, u32)> {
        self.screen.as_ref().map(|s| s.size)
    }

    /// Uniform values used by the next `render`.
    pub fn uniforms(&self) -> HalftoneUniforms {
        self.uniforms
    }

    /// Replaces all effect parameters.
    pub fn update_uniforms(&mut self, uniforms: HalftoneUniforms) {
        self.uniforms = uniforms;
    }

    /// Updates only the render target size (drawable resize).
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.uniforms.screen_size = [width as f32, height as f32];
    }

    /// Uploads `frame` as the screen texture.
    ///
    /// Frames larger than the device's 2D texture limit are downscaled to fit
    /// before upload.
    pub fn update_screen_texture(&mut self, ctx: &RenderCtx<'_>, frame: &CapturedFrame) {
        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        let fitted = CapturedFrame::fitted_size(frame.size(), max_dim);
        let downscaled = fitted != frame.size();
        let scaled;
        let frame = if !downscaled {
            frame
        } else {
            match frame.resized(fitted.0, fitted.1) {
                Ok(f) => {
                    scaled = f;
                    &scaled
                }
                Err(e) => {
                    log::error!("failed to downscale {}x{} frame: {e:#}", frame.width(), frame.height());
                    return;
                }
            }
        };

        let format = screen_texture_format(ctx.surface_format);
        let reuse = self
            .screen
            .as_ref()
            .is_some_and(|s| s.size == frame.size() && s.format == format);

        if !reuse {
            if downscaled {
                log::warn!(
                    "frame exceeds the {max_dim}px texture limit; downscaling to {}x{}",
                    fitted.0,
                    fitted.1
                );
            }
            log::debug!(
                "allocating screen texture {}x{} {format:?}",
                frame.width(),
                frame.height()
            );
            self.screen = Some(create_screen_texture(ctx.device, frame.size(), format));
            self.bind_group = None;
        }

        let Some(screen) = self.screen.as_ref() else { return };
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &screen.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(frame.bytes_per_row()),
                rows_per_image: Some(frame.height()),
            },
            extent(frame.size()),
        );
    }

    /// Clears `target` to `clear` and, when a screen texture exists, draws the
    /// halftone quad over it. Returns whether the quad was drawn.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        clear: wgpu::Color,
    ) -> bool {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        if let Some(ubo) = self.uniform_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&self.uniforms));
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("halftone pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(pipeline) = self.pipeline.as_ref() else { return false };
        let Some(bind_group) = self.bind_group.as_ref() else { return false };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return false };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(BIND_GROUP, bind_group, &[]);
        rpass.set_vertex_buffer(VertexInputIndex::Vertices as u32, quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        true
    }

    /// Clears `target` without drawing (hidden overlay).
    pub fn clear(target: &mut RenderTarget<'_>, clear: wgpu::Color) {
        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("halftone clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("halftone shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("halftone bgl"),
                    entries: &bind_group_layout_entries(),
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("halftone pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("halftone pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    // Every pixel is overwritten; no blending.
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("halftone pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // Bind groups are tied to the layout they were created with.
        self.bind_group = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_none() {
            self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("halftone quad vbo"),
                contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
                usage: wgpu::BufferUsages::VERTEX,
            }));
        }

        if self.uniform_ubo.is_none() {
            self.uniform_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("halftone uniforms ubo"),
                size: uniforms_min_binding_size().get(),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }

        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("halftone screen sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            }));
        }
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(screen) = self.screen.as_ref() else { return };
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("halftone bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TextureIndex::Screen as u32,
                    resource: wgpu::BindingResource::TextureView(&screen.view),
                },
                wgpu::BindGroupEntry {
                    binding: VertexInputIndex::Uniforms as u32,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: SamplerIndex::Screen as u32,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
    }
}

/// Texture format for captured frames: sRGB-encoded RGBA8 when the surface
/// is sRGB (so sampling linearizes and the surface re-encodes), plain
/// otherwise.
pub(crate) fn screen_texture_format(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

const UNIFORMS_SIZE: NonZeroU64 =
    match NonZeroU64::new(std::mem::size_of::<HalftoneUniforms>() as u64) {
        Some(size) => size,
        None => panic!("HalftoneUniforms must not be zero-sized"),
    };

/// Returns the `wgpu` minimum binding size for the uniform buffer.
pub(crate) fn uniforms_min_binding_size() -> NonZeroU64 {
    UNIFORMS_SIZE
}

pub(crate) fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: TextureIndex::Screen as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: VertexInputIndex::Uniforms as u32,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(uniforms_min_binding_size()),
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: SamplerIndex::Screen as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

fn extent((width, height): (u32, u32)) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn create_screen_texture(
    device: &wgpu::Device,
    size: (u32, u32),
    format: wgpu::TextureFormat,
) -> ScreenTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("halftone screen texture"),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    ScreenTexture {
        texture,
        view,
        size,
        format,
    }
}
