use std::path::Path;

use glam::Mat4;
use image::RgbaImage;
use log::{debug, warn};
use sprite_engine::{
    frame_loop::FrameTime,
    math::rectangle::Rect,
    sprites::{
        sprite::{Sprite, SpriteId},
        sprite_pool::SpritePool,
    },
};

use crate::{
    error::RendererError,
    renderer_config::RendererConfig,
    rendering::{
        projection::pixel_projection,
        quad::sprite_quad,
        resolution::{PhysicalSizeExt, Resolution},
        surface::{ClearColor, GpuSurface, TextureHandle},
        vertex_buffer::VertexBuffer,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub quad_count: usize,
    pub vertex_count: usize,
    /// Whether a draw call was issued this frame
    pub submitted: bool,
}

/// Turns every allocated sprite in the pool into one vertex stream and draws it with a
/// single call per frame.
pub struct BatchRenderer<S: GpuSurface> {
    surface: S,
    pool: SpritePool,
    vertex_buffer: VertexBuffer,
    projection: Mat4,
    textures: Vec<TextureInfo>,
    active_texture: Option<usize>,
    last_stats: BatchStats,
}

impl<S: GpuSurface> BatchRenderer<S> {
    pub fn new(mut surface: S, pool: SpritePool, config: &RendererConfig) -> Self {
        let vertex_buffer =
            VertexBuffer::with_quad_capacity(config.min_quad_capacity.max(pool.capacity()));

        let projection = pixel_projection(surface.resolution());
        surface.set_projection(projection);
        surface.set_clear_color(config.clear_color());

        BatchRenderer {
            surface,
            pool,
            vertex_buffer,
            projection,
            textures: Vec::new(),
            active_texture: None,
            last_stats: BatchStats::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn sprites(&self) -> &SpritePool {
        &self.pool
    }

    pub fn sprites_mut(&mut self) -> &mut SpritePool {
        &mut self.pool
    }

    /// Takes a sprite from the pool and places it at `bounds`, at rest.
    pub fn add_sprite(&mut self, bounds: Rect) -> &mut Sprite {
        self.pool
            .get_free()
            .initialize(bounds.origin.x, bounds.origin.y, bounds.size.x, bounds.size.y)
            .set_velocity(0.0, 0.0)
    }

    pub fn remove_sprite(&mut self, id: SpriteId) {
        self.pool.free(id);
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn last_stats(&self) -> BatchStats {
        self.last_stats
    }

    /// Writes one quad per allocated sprite, in pool order. Returns the number of quads.
    pub fn build_batch(&mut self) -> usize {
        if self.vertex_buffer.ensure_quad_capacity(self.pool.capacity()) {
            debug!(
                "Vertex buffer grown to {} quads",
                self.vertex_buffer.quad_capacity()
            );
        }

        self.vertex_buffer.begin();
        for sprite in self.pool.iter_allocated() {
            self.vertex_buffer.push_quad(&sprite_quad(sprite.bounds()));
        }

        self.vertex_buffer.quad_count()
    }

    /// Builds this frame's batch and submits it. Frames without sprites are only cleared.
    #[profiling::function]
    pub fn draw(&mut self) -> anyhow::Result<BatchStats> {
        let quad_count = self.build_batch();
        let vertex_count = self.vertex_buffer.vertex_count();

        if quad_count > 0 {
            self.surface.upload_vertices(self.vertex_buffer.written())?;
            self.surface.draw_triangles(vertex_count as u32)?;
        } else {
            self.surface.clear_frame()?;
        }

        self.last_stats = BatchStats {
            quad_count,
            vertex_count,
            submitted: quad_count > 0,
        };
        Ok(self.last_stats)
    }

    pub fn update_time(&mut self, time: &FrameTime) {
        self.surface.set_time(time.elapsed_time_s as f32);
    }

    /// Resizes the surface and recomputes the projection if the size actually changed.
    /// Returns whether anything was updated.
    pub fn set_viewport(&mut self, resolution: Resolution) -> bool {
        if resolution.is_empty() {
            debug!(
                "Ignoring empty viewport {}x{}",
                resolution.width, resolution.height
            );
            return false;
        }

        if resolution == self.surface.resolution() {
            return false;
        }

        self.surface.resize(resolution);
        self.projection = pixel_projection(resolution);
        self.surface.set_projection(self.projection);
        true
    }

    pub fn set_clear_color(&mut self, color: ClearColor) {
        self.surface.set_clear_color(color);
    }

    pub fn textures(&self) -> &[TextureInfo] {
        &self.textures
    }

    fn check_texture_limit(&self) -> Result<(), RendererError> {
        let max = self.surface.max_textures();
        if self.textures.len() >= max {
            return Err(RendererError::TextureLimitReached { max });
        }
        Ok(())
    }

    /// Decodes an image file and uploads it as a new texture.
    pub fn load_texture(&mut self, path: &Path) -> Result<TextureInfo, RendererError> {
        self.check_texture_limit()?;

        let image = image::open(path)
            .map_err(|source| {
                warn!("Failed to load texture {:?}: {}", path, source);
                RendererError::TextureLoad {
                    path: path.to_path_buf(),
                    source,
                }
            })?
            .to_rgba8();

        self.create_texture(&image)
    }

    pub fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureInfo, RendererError> {
        self.check_texture_limit()?;

        let (width, height) = image.dimensions();
        let info = TextureInfo {
            handle: self.surface.create_texture(image)?,
            width,
            height,
        };
        self.textures.push(info);
        Ok(info)
    }

    /// Binds texture `index` for all sprites. Returns `None` if no such texture exists.
    pub fn set_texture(&mut self, index: usize) -> Option<TextureInfo> {
        let info = *self.textures.get(index)?;

        if self.active_texture != Some(index) {
            self.surface.bind_texture(info.handle);
            self.active_texture = Some(index);
        }

        Some(info)
    }
}
