use crate::rendering::{limits::VERTICES_PER_QUAD, vertex::SpriteVertex};

/// CPU-side staging buffer for one frame's quads.
///
/// The allocation only ever grows. Each frame overwrites it from the start and only the
/// written prefix is meant to be uploaded.
#[derive(Debug)]
pub struct VertexBuffer {
    vertices: Vec<SpriteVertex>,
    quad_count: usize,
}

impl VertexBuffer {
    pub fn with_quad_capacity(quads: usize) -> Self {
        VertexBuffer {
            vertices: vec![SpriteVertex::default(); quads * VERTICES_PER_QUAD],
            quad_count: 0,
        }
    }

    pub fn quad_capacity(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Reallocates to exactly `quads` if the buffer is smaller. Returns whether it grew.
    pub fn ensure_quad_capacity(&mut self, quads: usize) -> bool {
        if self.quad_capacity() >= quads {
            return false;
        }

        self.vertices
            .resize(quads * VERTICES_PER_QUAD, SpriteVertex::default());
        true
    }

    /// Starts a new frame. Old contents stay in place until overwritten.
    pub fn begin(&mut self) {
        self.quad_count = 0;
    }

    /// Writes a quad after the last one. Callers must reserve room with `ensure_quad_capacity`.
    pub fn push_quad(&mut self, quad: &[SpriteVertex; VERTICES_PER_QUAD]) {
        let start = self.quad_count * VERTICES_PER_QUAD;
        self.vertices[start..start + VERTICES_PER_QUAD].copy_from_slice(quad);
        self.quad_count += 1;
    }

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    pub fn vertex_count(&self) -> usize {
        self.quad_count * VERTICES_PER_QUAD
    }

    pub fn written(&self) -> &[SpriteVertex] {
        &self.vertices[..self.vertex_count()]
    }

    /// The written prefix as a flat float stream, 5 floats per vertex.
    pub fn written_floats(&self) -> &[f32] {
        bytemuck::cast_slice(self.written())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::rendering::limits::FLOATS_PER_QUAD;

    fn quad_at(x: f32) -> [SpriteVertex; VERTICES_PER_QUAD] {
        [SpriteVertex::new(Vec2::new(x, 0.0), Vec2::ZERO); VERTICES_PER_QUAD]
    }

    #[test]
    fn test_grows_monotonically() {
        let mut buffer = VertexBuffer::with_quad_capacity(4);
        assert_eq!(buffer.quad_capacity(), 4);

        assert!(!buffer.ensure_quad_capacity(2), "Must not shrink");
        assert_eq!(buffer.quad_capacity(), 4);

        assert!(buffer.ensure_quad_capacity(9));
        assert_eq!(buffer.quad_capacity(), 9);
        assert!(!buffer.ensure_quad_capacity(9));
    }

    #[test]
    fn test_frames_overwrite_prefix() {
        let mut buffer = VertexBuffer::with_quad_capacity(4);

        buffer.begin();
        buffer.push_quad(&quad_at(1.0));
        buffer.push_quad(&quad_at(2.0));
        assert_eq!(buffer.written_floats().len(), 2 * FLOATS_PER_QUAD);

        buffer.begin();
        buffer.push_quad(&quad_at(3.0));
        assert_eq!(buffer.quad_count(), 1);
        assert_eq!(buffer.written().len(), VERTICES_PER_QUAD);
        assert_eq!(buffer.written_floats()[0], 3.0);
        assert_eq!(buffer.quad_capacity(), 4);
    }

    #[test]
    fn test_empty_frame() {
        let mut buffer = VertexBuffer::with_quad_capacity(0);
        buffer.begin();
        assert!(buffer.written_floats().is_empty());
        assert_eq!(buffer.vertex_count(), 0);
    }
}
