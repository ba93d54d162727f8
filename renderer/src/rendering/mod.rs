pub mod batch_renderer;
pub mod limits;
pub mod memory;
pub mod projection;
pub mod quad;
pub mod resolution;
pub mod surface;
pub mod texture;
pub mod util;
pub mod vertex;
pub mod vertex_buffer;
pub mod wgpu_surface;
