use serde::{Deserialize, Serialize};

use crate::{config::config_manager::Config, limits::DEFAULT_GROWTH_STEP};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Each pool growth appends `pool_growth_step + 1` sprite slots.
    pub pool_growth_step: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_growth_step: DEFAULT_GROWTH_STEP,
        }
    }
}

impl Config for EngineConfig {
    fn get_path() -> &'static str {
        "engine.ron"
    }

    fn is_valid(&self) -> bool {
        self.pool_growth_step >= 1
    }
}
