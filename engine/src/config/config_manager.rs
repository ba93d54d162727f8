use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::Duration,
};

use anyhow::Context;
use debounce::EventDebouncer;
use log::{error, warn};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

/// A RON-backed settings file. Loaded once at startup, written back (debounced) on change.
pub struct ConfigManager<T> {
    path: PathBuf,
    current: Arc<RwLock<T>>,
    debouncer: EventDebouncer<SaveConfigEvent>,
}

const CONFIG_DEBOUNCE_DURATION_MS: u64 = 200;

pub trait Config:
    Sized + Default + Clone + Send + Sync + Serialize + for<'a> Deserialize<'a> + 'static
{
    fn get_path() -> &'static str;

    fn is_valid(&self) -> bool {
        true
    }

    fn create_manager() -> anyhow::Result<ConfigManager<Self>> {
        let mut manager = ConfigManager::new(PathBuf::from(Self::get_path()));
        manager
            .load_if_exists()
            .with_context(|| format!("Failed to load config from {}", Self::get_path()))?;
        Ok(manager)
    }
}

#[derive(Clone, Copy, PartialEq)]
struct SaveConfigEvent;

impl<T> ConfigManager<T>
where
    T: Config,
{
    pub fn new(path: PathBuf) -> Self {
        let current = Arc::new(RwLock::new(T::default()));
        let current_clone = current.clone();
        let path_clone = path.clone();

        let save_config = move |_event: SaveConfigEvent| {
            let Ok(config) = current_clone.read() else {
                error!("Config lock for {:?} is poisoned, not saving", &path_clone);
                return;
            };

            if let Err(err) = write_config(&path_clone, &*config) {
                error!("Failed to save config to {:?}: {:#}", &path_clone, err);
            }
        };

        Self {
            path,
            current,
            debouncer: EventDebouncer::new(
                Duration::from_millis(CONFIG_DEBOUNCE_DURATION_MS),
                save_config,
            ),
        }
    }

    pub fn get(&self) -> Arc<RwLock<T>> {
        self.current.clone()
    }

    /// Returns a copy of the current values.
    pub fn snapshot(&self) -> T {
        match self.current.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn load_if_exists(&mut self) -> anyhow::Result<()> {
        let Some(config) = read_config::<T>(&self.path)? else {
            return Ok(());
        };

        if !config.is_valid() {
            warn!(
                "Ignoring invalid config in {:?}, using defaults",
                &self.path
            );
            return Ok(());
        }

        match self.current.write() {
            Ok(mut current) => current.clone_from(&config),
            Err(poisoned) => poisoned.into_inner().clone_from(&config),
        }
        Ok(())
    }

    pub fn update_and_save<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut config = match self.current.write() {
                Ok(config) => config,
                Err(poisoned) => poisoned.into_inner(),
            };
            update_fn(&mut *config);
        }
        self.debouncer.put(SaveConfigEvent);
    }
}

/// Reads a config file. A missing or empty file yields `None`.
pub fn read_config<T: Config>(path: &Path) -> anyhow::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let config_data = std::fs::read_to_string(path)?;
    if config_data.trim().is_empty() {
        return Ok(None);
    }

    let config: T = ron::from_str(&config_data)
        .with_context(|| format!("Failed to parse config from {:?}", path))?;
    Ok(Some(config))
}

fn write_config<T: Config>(path: &Path, config: &T) -> anyhow::Result<()> {
    if !config.is_valid() {
        warn!("Attempted to write invalid config to {:?}", path);
        return Ok(());
    }

    let serialized = ron::ser::to_string_pretty(config, PrettyConfig::default())?;
    let mut writer = File::create(path)?;
    writer.write_all(serialized.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::engine_config::EngineConfig;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sprite_engine_{}_{}.ron", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let mut manager: ConfigManager<EngineConfig> =
            ConfigManager::new(temp_path("missing_does_not_exist"));
        manager.load_if_exists().unwrap();
        assert_eq!(manager.snapshot(), EngineConfig::default());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let path = temp_path("roundtrip");
        let config = EngineConfig {
            pool_growth_step: 64,
        };
        write_config(&path, &config).unwrap();

        let mut manager: ConfigManager<EngineConfig> = ConfigManager::new(path.clone());
        manager.load_if_exists().unwrap();
        assert_eq!(manager.snapshot().pool_growth_step, 64);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_file_is_ignored() {
        let path = temp_path("invalid");
        std::fs::write(&path, "(pool_growth_step: 0)").unwrap();

        let mut manager: ConfigManager<EngineConfig> = ConfigManager::new(path.clone());
        manager.load_if_exists().unwrap();
        assert_eq!(manager.snapshot(), EngineConfig::default());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed");
        std::fs::write(&path, "(pool_growth_step: \"lots\")").unwrap();

        let mut manager: ConfigManager<EngineConfig> = ConfigManager::new(path.clone());
        assert!(manager.load_if_exists().is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
