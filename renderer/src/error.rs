use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("sprite shader failed to compile:\n{0}")]
    ShaderCompilation(String),

    #[error("maximum number of textures ({max}) already created")]
    TextureLimitReached { max: usize },

    #[error("texture of {width}x{height} exceeds the device limit of {max} pixels per side")]
    TextureTooLarge { width: u32, height: u32, max: u32 },

    #[error("vertex upload of {requested_bytes} bytes exceeds the device buffer limit of {max_bytes}")]
    VertexBufferTooLarge { requested_bytes: u64, max_bytes: u64 },

    #[error("could not load texture from {path:?}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
