//! Server and client configuration.
//!
//! Both live under `<config_dir>/daybook/` and can be overridden from the
//! environment. The client configuration also records login and browsing
//! state, so it is written back after commands that change it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::view::ViewSpan;

static DEFAULT_DATA_DIR: &str = "~/daybook";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| ConfigError("Could not determine config directory".into()))?
        .join("daybook"))
}

/// Layer an optional TOML file under environment variables.
fn load_layered<T: DeserializeOwned>(path: &Path, env_prefix: &str) -> Result<T, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(config)
}

/// Server settings, `server.toml`, env prefix `DAYBOOK_SERVER_`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("server.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_layered(path, "DAYBOOK_SERVER")
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client settings and state, `client.toml`, env prefix `DAYBOOK_`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Name of the logged-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default)]
    pub view: ViewSpan,

    /// Date being browsed; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shown_date: Option<NaiveDate>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: default_server_url(),
            user: None,
            view: ViewSpan::default(),
            shown_date: None,
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("client.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_layered(path, "DAYBOOK")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError(format!("Could not create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError(format!("Could not write config file: {e}")))?;
        Ok(())
    }

    pub fn shown_date_or(&self, today: NaiveDate) -> NaiveDate {
        self.shown_date.unwrap_or(today)
    }
}
