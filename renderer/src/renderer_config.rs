use serde::{Deserialize, Serialize};
use sprite_engine::config::config_manager::Config;

use crate::rendering::{
    limits::{DEFAULT_MAX_TEXTURES, DEFAULT_MIN_QUAD_CAPACITY},
    surface::ClearColor,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    pub enable_vsync: bool,
    /// RGBA, each channel in 0..=1
    pub clear_color: [f64; 4],
    /// Quads the vertex buffer holds before it first has to grow.
    pub min_quad_capacity: usize,
    pub max_textures: usize,
}

impl RendererConfig {
    pub fn clear_color(&self) -> ClearColor {
        ClearColor::from(self.clear_color)
    }
}

impl Config for RendererConfig {
    fn get_path() -> &'static str {
        "renderer.ron"
    }

    fn is_valid(&self) -> bool {
        self.max_textures > 0
            && self
                .clear_color
                .iter()
                .all(|channel| (0.0..=1.0).contains(channel))
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enable_vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            min_quad_capacity: DEFAULT_MIN_QUAD_CAPACITY,
            max_textures: DEFAULT_MAX_TEXTURES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: RendererConfig = ron::from_str("(enable_vsync: false)").unwrap();
        assert!(!config.enable_vsync);
        assert_eq!(config.min_quad_capacity, DEFAULT_MIN_QUAD_CAPACITY);
        assert!(config.is_valid());
    }

    #[test]
    fn test_out_of_range_color_is_invalid() {
        let config = RendererConfig {
            clear_color: [0.0, 2.0, 0.0, 1.0],
            ..Default::default()
        };
        assert!(!config.is_valid());
    }
}
