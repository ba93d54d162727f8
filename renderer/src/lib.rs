pub mod error;
pub mod renderer_config;
pub mod rendering;
