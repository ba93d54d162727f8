use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sprite_engine::config::config_manager::Config;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize, Position, Size},
    window::WindowAttributes,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub window_size: Option<(u32, u32)>,
    pub window_position: Option<(i32, i32)>,

    /// Sprites emitted per fixed update
    pub sprites_per_tick: u32,
    /// Edge length of a spawned sprite, in pixels
    pub sprite_size: f32,
    pub sprite_life_s: f32,
    /// Launch speed in pixels per second
    pub max_speed: f32,
    pub gravity: f32,
    pub texture_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            window_size: None,
            window_position: None,
            sprites_per_tick: 8,
            sprite_size: 8.0,
            sprite_life_s: 3.0,
            max_speed: 600.0,
            gravity: 400.0,
            texture_path: Some(PathBuf::from("game/assets/sprite.png")),
        }
    }
}

impl Config for ClientConfig {
    fn get_path() -> &'static str {
        "client.ron"
    }

    fn is_valid(&self) -> bool {
        match self.window_size {
            Some((width, height)) if width == 0 || height == 0 => {
                return false;
            }
            _ => {}
        }

        self.sprite_size > 0.0 && self.sprite_life_s > 0.0 && self.max_speed >= 0.0
    }
}

impl ClientConfig {
    pub fn create_window_attributes(&self) -> WindowAttributes {
        let base_attributes = WindowAttributes::default()
            .with_title("Sprite fountain")
            .with_active(false);

        let base_attributes = match self.window_size {
            Some((width, height)) => {
                base_attributes.with_inner_size(Size::Physical(PhysicalSize { width, height }))
            }
            None => base_attributes,
        };

        match self.window_position {
            Some((x, y)) => {
                base_attributes.with_position(Position::Physical(PhysicalPosition { x, y }))
            }
            None => base_attributes,
        }
    }
}
