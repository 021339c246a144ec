use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_DB_PATH: &str = "dirledger.db";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Load `Config.toml` from the working directory (optional), then let
/// `DIRLEDGER_*` environment variables override it.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_from("Config")
}

pub fn load_from(name: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(Environment::with_prefix("DIRLEDGER"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
