// Two triangles per sprite, no index buffer
pub const VERTICES_PER_QUAD: usize = 6;
// position.xyz + tex_coord.uv
pub const FLOATS_PER_VERTEX: usize = 5;
pub const FLOATS_PER_QUAD: usize = VERTICES_PER_QUAD * FLOATS_PER_VERTEX;

// Quads the vertex buffer can hold before the first reallocation
pub const DEFAULT_MIN_QUAD_CAPACITY: usize = 500;

pub const DEFAULT_MAX_TEXTURES: usize = 16;
