use glam::Mat4;
use image::RgbaImage;

use crate::{
    error::RendererError,
    rendering::{resolution::Resolution, vertex::SpriteVertex},
};

/// Opaque handle to a texture owned by a [`GpuSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const BLACK: ClearColor = ClearColor::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        ClearColor { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        ClearColor { r, g, b, a }
    }
}

impl From<[f64; 4]> for ClearColor {
    fn from([r, g, b, a]: [f64; 4]) -> Self {
        ClearColor { r, g, b, a }
    }
}

/// The rendering backend the batch renderer draws through.
///
/// Implementations own the compiled sprite program; constructing one must fail outright if
/// the program cannot be built.
pub trait GpuSurface {
    fn resolution(&self) -> Resolution;

    /// Resizes the render target. Does not touch the projection.
    fn resize(&mut self, resolution: Resolution);

    fn set_projection(&mut self, projection: Mat4);

    /// Shader-visible time in seconds.
    fn set_time(&mut self, time_s: f32);

    fn set_clear_color(&mut self, color: ClearColor);

    /// Binds the vertex buffer and uploads `vertices` to its start, growing it if needed.
    /// Fails without uploading anything if the device can't hold a buffer that large.
    fn upload_vertices(&mut self, vertices: &[SpriteVertex]) -> Result<(), RendererError>;

    /// Clears the target and issues one triangle-list draw over the first `vertex_count`
    /// uploaded vertices.
    fn draw_triangles(&mut self, vertex_count: u32) -> anyhow::Result<()>;

    /// Clears the target without drawing anything.
    fn clear_frame(&mut self) -> anyhow::Result<()>;

    fn max_textures(&self) -> usize;

    /// Fails with [`RendererError::TextureTooLarge`] if either side exceeds the device limit.
    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, RendererError>;

    /// Makes `handle` the texture sampled by every sprite.
    fn bind_texture(&mut self, handle: TextureHandle);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Surface that records every call, for tests that don't have a GPU.
    #[derive(Debug)]
    pub(crate) struct RecordingSurface {
        pub resolution: Resolution,
        pub max_textures: usize,
        pub max_texture_dimension: u32,
        pub max_upload_vertices: usize,
        pub resizes: Vec<Resolution>,
        pub projections: Vec<Mat4>,
        pub times: Vec<f32>,
        pub clear_colors: Vec<ClearColor>,
        pub uploads: Vec<Vec<SpriteVertex>>,
        pub draws: Vec<u32>,
        pub clears: usize,
        pub textures: Vec<(u32, u32)>,
        pub bound_textures: Vec<TextureHandle>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            RecordingSurface {
                resolution: Resolution::new(width, height),
                max_textures: 4,
                max_texture_dimension: 64,
                max_upload_vertices: usize::MAX,
                resizes: Vec::new(),
                projections: Vec::new(),
                times: Vec::new(),
                clear_colors: Vec::new(),
                uploads: Vec::new(),
                draws: Vec::new(),
                clears: 0,
                textures: Vec::new(),
                bound_textures: Vec::new(),
            }
        }

        pub fn last_upload_floats(&self) -> &[f32] {
            self.uploads
                .last()
                .map(|vertices| bytemuck::cast_slice(vertices.as_slice()))
                .unwrap_or(&[])
        }
    }

    impl GpuSurface for RecordingSurface {
        fn resolution(&self) -> Resolution {
            self.resolution
        }

        fn resize(&mut self, resolution: Resolution) {
            self.resolution = resolution;
            self.resizes.push(resolution);
        }

        fn set_projection(&mut self, projection: Mat4) {
            self.projections.push(projection);
        }

        fn set_time(&mut self, time_s: f32) {
            self.times.push(time_s);
        }

        fn set_clear_color(&mut self, color: ClearColor) {
            self.clear_colors.push(color);
        }

        fn upload_vertices(&mut self, vertices: &[SpriteVertex]) -> Result<(), RendererError> {
            if vertices.len() > self.max_upload_vertices {
                return Err(RendererError::VertexBufferTooLarge {
                    requested_bytes: size_of_val(vertices) as u64,
                    max_bytes: (self.max_upload_vertices * size_of::<SpriteVertex>()) as u64,
                });
            }

            self.uploads.push(vertices.to_vec());
            Ok(())
        }

        fn draw_triangles(&mut self, vertex_count: u32) -> anyhow::Result<()> {
            self.draws.push(vertex_count);
            Ok(())
        }

        fn clear_frame(&mut self) -> anyhow::Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn max_textures(&self) -> usize {
            self.max_textures
        }

        fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureHandle, RendererError> {
            let (width, height) = image.dimensions();
            let max = self.max_texture_dimension;
            if width > max || height > max {
                return Err(RendererError::TextureTooLarge { width, height, max });
            }

            self.textures.push((width, height));
            Ok(TextureHandle(self.textures.len() - 1))
        }

        fn bind_texture(&mut self, handle: TextureHandle) {
            self.bound_textures.push(handle);
        }
    }
}
