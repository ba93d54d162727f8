use std::sync::Arc;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use image::{Rgba, RgbaImage};
use log::{debug, info};
use wgpu::{RenderPassDescriptor, ShaderModuleDescriptor, wgt::CommandEncoderDescriptor};
use winit::window::Window;

use crate::{
    error::RendererError,
    renderer_config::RendererConfig,
    rendering::{
        limits::VERTICES_PER_QUAD,
        memory::typed_buffer::{GpuBuffer, GpuBufferArray},
        resolution::{PhysicalSizeExt, Resolution},
        surface::{ClearColor, GpuSurface, TextureHandle},
        texture::SpriteTexture,
        util::bind_group_builder::BindGroupBuilder,
        vertex::SpriteVertex,
    },
};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct SpriteUniform {
    projection: Mat4,
    time: f32,
    _padding: [f32; 3],
}

/// [`GpuSurface`] backed by a wgpu surface on a winit window.
pub struct WgpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    is_surface_configured: bool,
    window: Arc<Window>,

    pipeline: wgpu::RenderPipeline,
    uniform: SpriteUniform,
    uniform_buffer: GpuBuffer<SpriteUniform>,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: GpuBufferArray<SpriteVertex>,
    clear_color: wgpu::Color,

    texture_layout: wgpu::BindGroupLayout,
    // Sampled until a texture is bound; plain white so sprites render as solid quads
    fallback_texture: SpriteTexture,
    textures: Vec<SpriteTexture>,
    active_texture: Option<usize>,
    max_textures: usize,
}

impl WgpuSurface {
    pub async fn new(
        window: Arc<Window>,
        renderer_config: &RendererConfig,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_capabilities.formats)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .context("Surface reports no alpha modes")?;

        let present_mode = {
            #[cfg(feature = "superluminal")]
            {
                wgpu::PresentMode::AutoNoVsync
            }
            #[cfg(not(feature = "superluminal"))]
            {
                if renderer_config.enable_vsync {
                    wgpu::PresentMode::AutoVsync
                } else {
                    wgpu::PresentMode::AutoNoVsync
                }
            }
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let source = include_str!(concat!(env!("OUT_DIR"), "/sprite.wgsl"));
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Sprite shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let compilation_info = module.get_compilation_info().await;
        let errors: Vec<String> = compilation_info
            .messages
            .iter()
            .filter(|message| {
                matches!(message.message_type, wgpu::CompilationMessageType::Error)
            })
            .map(|message| message.message.clone())
            .collect();

        if !errors.is_empty() {
            return Err(RendererError::ShaderCompilation(errors.join("\n")).into());
        }

        let uniform = SpriteUniform {
            projection: Mat4::IDENTITY,
            time: 0.0,
            _padding: [0.0; 3],
        };

        let uniform_buffer = GpuBuffer::new_with_data(
            &device,
            &queue,
            "Sprite uniform buffer",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            &uniform,
        );

        let (uniform_layout, uniform_bind_group) = BindGroupBuilder::new(
            "Sprite uniforms",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        )
        .uniform(
            0,
            wgpu::BindingResource::Buffer(uniform_buffer.inner().as_entire_buffer_binding()),
        )
        .build(&device);

        let texture_layout = SpriteTexture::create_bind_group_layout(&device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            ..Default::default()
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // Additive: overlapping sprites brighten each other
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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

        let vertex_buffer = GpuBufferArray::new(
            &device,
            &queue,
            "Sprite vertex buffer",
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            renderer_config.min_quad_capacity * VERTICES_PER_QUAD,
        );

        let white = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let fallback_texture = SpriteTexture::from_image(
            &device,
            &queue,
            &texture_layout,
            &white,
            "Fallback sprite texture",
        );

        let clear_color = renderer_config.clear_color();

        let mut wgpu_surface = WgpuSurface {
            surface,
            device,
            queue,
            config,
            is_surface_configured: false,
            window,
            pipeline,
            uniform,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            clear_color: to_wgpu_color(clear_color),
            texture_layout,
            fallback_texture,
            textures: Vec::new(),
            active_texture: None,
            max_textures: renderer_config.max_textures,
        };

        // A later resize to the same size is a no-op, so configure now
        wgpu_surface.resize(size);

        Ok(wgpu_surface)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    fn bound_texture(&self) -> &SpriteTexture {
        self.active_texture
            .and_then(|index| self.textures.get(index))
            .unwrap_or(&self.fallback_texture)
    }

    fn render_frame(&mut self, vertex_count: Option<u32>) -> anyhow::Result<()> {
        self.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => {
                self.resize(Resolution::new(self.config.width, self.config.height));
                return Ok(());
            }
            Err(wgpu::SurfaceError::Outdated) => return Ok(()),
            Err(error) => return Err(error.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Sprite render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                multiview_mask: None,
                timestamp_writes: None,
            });

            if let Some(vertex_count) = vertex_count {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, self.bound_texture().bind_group(), &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.inner().slice(..));
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit([encoder.finish()]);
        output.present();
        profiling::finish_frame!();

        Ok(())
    }
}

/// Prefers an sRGB format, otherwise takes the first one the surface offers.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> anyhow::Result<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .context("Surface reports no formats")
}

fn to_wgpu_color(color: ClearColor) -> wgpu::Color {
    wgpu::Color {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

impl GpuSurface for WgpuSurface {
    fn resolution(&self) -> Resolution {
        Resolution::new(self.config.width, self.config.height)
    }

    fn resize(&mut self, resolution: Resolution) {
        if resolution.is_empty() {
            self.is_surface_configured = false;
            return;
        }

        self.config.width = resolution.width;
        self.config.height = resolution.height;
        self.surface.configure(&self.device, &self.config);
        self.is_surface_configured = true;
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.uniform.projection = projection;
        self.uniform_buffer.write_data(&self.uniform);
    }

    fn set_time(&mut self, time_s: f32) {
        self.uniform.time = time_s;
        self.uniform_buffer.write_data(&self.uniform);
    }

    fn set_clear_color(&mut self, color: ClearColor) {
        self.clear_color = to_wgpu_color(color);
    }

    fn upload_vertices(&mut self, vertices: &[SpriteVertex]) -> Result<(), RendererError> {
        let requested_bytes = size_of_val(vertices) as u64;
        let max_bytes = self.device.limits().max_buffer_size;
        if requested_bytes > max_bytes {
            return Err(RendererError::VertexBufferTooLarge {
                requested_bytes,
                max_bytes,
            });
        }

        if self.vertex_buffer.ensure_capacity(&self.device, vertices.len()) {
            debug!(
                "GPU vertex buffer grown to {} vertices",
                self.vertex_buffer.capacity()
            );
        }

        self.vertex_buffer.write_data(vertices);
        Ok(())
    }

    #[profiling::function]
    fn draw_triangles(&mut self, vertex_count: u32) -> anyhow::Result<()> {
        self.render_frame(Some(vertex_count))
    }

    fn clear_frame(&mut self) -> anyhow::Result<()> {
        self.render_frame(None)
    }

    fn max_textures(&self) -> usize {
        self.max_textures
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, RendererError> {
        let (width, height) = image.dimensions();
        let max = self.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RendererError::TextureTooLarge { width, height, max });
        }

        let index = self.textures.len();
        let label = format!("Sprite texture {index}");
        self.textures.push(SpriteTexture::from_image(
            &self.device,
            &self.queue,
            &self.texture_layout,
            image,
            &label,
        ));

        Ok(TextureHandle(index))
    }

    fn bind_texture(&mut self, handle: TextureHandle) {
        if handle.0 < self.textures.len() {
            self.active_texture = Some(handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_surface_format() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            pick_surface_format(&formats).unwrap(),
            wgpu::TextureFormat::Bgra8UnormSrgb
        );
        assert_eq!(
            pick_surface_format(&[wgpu::TextureFormat::Rgba16Float]).unwrap(),
            wgpu::TextureFormat::Rgba16Float
        );
        assert!(
            pick_surface_format(&[]).is_err(),
            "An adapter without formats is an error, not a panic"
        );
    }
}
