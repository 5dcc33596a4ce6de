use std::{env, fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::DsResult;

pub const CONFIG_ENV: &str = "MQTTDS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "mqttds.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub datasource_uid: String,
    // ms
    pub interval_ms: u64,
    pub settings_path: String,
    pub queries_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            datasource_uid: "mqtt".to_owned(),
            interval_ms: 0,
            settings_path: "datasource.json".to_owned(),
            queries_path: None,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> DsResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the file named by `MQTTDS_CONFIG`, falling back to `mqttds.toml`.
    /// A missing file yields the defaults.
    pub fn load() -> DsResult<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> DsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let txt = fs::read_to_string(path)?;
        if txt.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_toml(&txt)
    }
}
