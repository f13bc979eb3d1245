use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::technique::TechniqueKind;

pub const DEFAULT_LENGTH_CHOICES: [u32; 3] = [1, 3, 5];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub technique: TechniqueKind,
    pub session_minutes: u32,
    /// Preset lengths offered on the setup screen, in minutes
    pub length_choices: Vec<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            technique: TechniqueKind::default(),
            session_minutes: 1,
            length_choices: DEFAULT_LENGTH_CHOICES.to_vec(),
        }
    }
}

impl Config {
    /// Drop zero-minute presets and repair a zero default length.
    pub fn sanitized(mut self) -> Self {
        self.length_choices.retain(|m| *m > 0);
        self.length_choices.sort_unstable();
        self.length_choices.dedup();
        if self.length_choices.is_empty() {
            warn!("config has no usable length choices, using defaults");
            self.length_choices = DEFAULT_LENGTH_CHOICES.to_vec();
        }
        if self.session_minutes == 0 {
            warn!("config session_minutes is 0, using first length choice");
            self.session_minutes = self.length_choices[0];
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Config::default();
            }
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            technique: TechniqueKind::Relaxing478,
            session_minutes: 5,
            length_choices: vec![2, 5, 10],
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "technique": "4-7-8" }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.technique, TechniqueKind::Relaxing478);
        assert_eq!(cfg.session_minutes, 1);
        assert_eq!(cfg.length_choices, vec![1, 3, 5]);
    }

    #[test]
    fn sanitized_repairs_zero_values() {
        let cfg = Config {
            technique: TechniqueKind::BoxBreathing,
            session_minutes: 0,
            length_choices: vec![0, 10, 3, 3],
        }
        .sanitized();
        assert_eq!(cfg.length_choices, vec![3, 10]);
        assert_eq!(cfg.session_minutes, 3);

        let cfg = Config {
            length_choices: vec![0],
            ..Config::default()
        }
        .sanitized();
        assert_eq!(cfg.length_choices, vec![1, 3, 5]);
    }
}
