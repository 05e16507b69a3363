use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::engine::CatchUpPolicy;
use crate::errors::StoreError;
use crate::utils::{app_data_dir, ensure_dir, write_atomic};

const CONFIG_FILE: &str = "config.json";

/// Application settings owned by the bootstrap layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// How the recurring engine treats periods missed while the app was
    /// closed.
    #[serde(default)]
    pub catch_up: CatchUpPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            catch_up: CatchUpPolicy::default(),
        }
    }
}

/// Loads and saves the JSON config file under the app data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StoreError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StoreError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, StoreError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, StoreError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
