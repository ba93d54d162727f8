use crate::{
    config::{
        config_manager::{Config, ConfigManager},
        engine_config::EngineConfig,
    },
    sprites::sprite_pool::SpritePool,
};

pub mod config;
pub mod frame_loop;
pub mod limits;
pub mod math;
pub mod memory;
pub mod sprites;

pub struct EngineContext {
    pub config: ConfigManager<EngineConfig>,
}

impl EngineContext {
    /// Creates an empty sprite pool sized by the current engine config.
    pub fn create_sprite_pool(&self) -> SpritePool {
        SpritePool::from_config(&self.config.snapshot())
    }
}

pub fn init_engine() -> anyhow::Result<EngineContext> {
    let config = EngineConfig::create_manager()?;
    log::info!(
        "Engine initialized, sprite pool growth step {}",
        config.snapshot().pool_growth_step
    );

    Ok(EngineContext { config })
}
