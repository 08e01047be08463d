//! Configuration management for Blockfront.
//!
//! Parses `blockfront.toml` with serde and discovers it in the current
//! directory or its parents. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in:
//! - `server.host`
//! - `store.data_dir`
//! - `media.base_url`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bf_fields::{BlockSchemas, FieldSchema};
use bf_settings::SlotDefinition;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the store data directory.
    pub data_dir: Option<PathBuf>,
    /// Override the media base URL.
    pub media_base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "blockfront.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Store configuration (paths are relative strings from TOML).
    store: StoreConfigRaw,
    /// Media configuration.
    pub media: MediaConfig,
    /// Setting slots.
    pub settings: SettingsConfig,
    /// Per-block field schemas keyed by block name.
    pub blocks: BTreeMap<String, BlockConfig>,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    data_dir: Option<String>,
}

/// Resolved store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Directory holding `content.json` and the option stores.
    pub data_dir: PathBuf,
}

/// Media configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Base URL relative media URLs are joined to.
    pub base_url: Option<String>,
}

/// Setting slot configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Slots keyed by name (`[settings.slots.logo]`).
    pub slots: BTreeMap<String, SlotDefinition>,
}

/// Configuration of one block type.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Field schema for the block's attributes.
    pub fields: FieldSchema,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `media.base_url`).
        field: String,
        /// Error message (e.g. `${MEDIA_URL} not set`).
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `blockfront.toml` in the current directory and its parents, and
    /// falls back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after path resolution and take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// validation fails, or CLI settings produce an invalid configuration.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(data_dir) = &settings.data_dir {
            self.store_resolved.data_dir.clone_from(data_dir);
        }
        if let Some(base_url) = &settings.media_base_url {
            self.media.base_url = Some(base_url.clone());
        }
    }

    /// Block schemas declared under `[blocks."<name>".fields]`.
    #[must_use]
    pub fn block_schemas(&self) -> BlockSchemas {
        let mut schemas = BlockSchemas::new();
        for (name, block) in &self.blocks {
            schemas.insert(name.clone(), block.fields.clone());
        }
        schemas
    }

    /// Configured setting slots in name order.
    ///
    /// Falls back to a single `logo` asset slot when none are configured.
    #[must_use]
    pub fn slot_definitions(&self) -> Vec<SlotDefinition> {
        if self.settings.slots.is_empty() {
            return vec![SlotDefinition::default_logo()];
        }
        self.settings
            .slots
            .iter()
            .map(|(name, slot)| SlotDefinition {
                name: name.clone(),
                ..slot.clone()
            })
            .collect()
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfigRaw::default(),
            media: MediaConfig::default(),
            settings: SettingsConfig::default(),
            blocks: BTreeMap::new(),
            store_resolved: StoreConfig {
                data_dir: base.join("data"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_media()?;
        self.validate_slots()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_media(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.media.base_url {
            require_non_empty(base_url, "media.base_url")?;
            require_http_url(base_url, "media.base_url")?;
        }
        Ok(())
    }

    fn validate_slots(&self) -> Result<(), ConfigError> {
        for (name, slot) in &self.settings.slots {
            require_non_empty(
                &slot.primary_key,
                &format!("settings.slots.{name}.primary_key"),
            )?;
            require_non_empty(
                &slot.secondary_key,
                &format!("settings.slots.{name}.secondary_key"),
            )?;
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref data_dir) = self.store.data_dir {
            self.store.data_dir = Some(expand::expand_env(data_dir, "store.data_dir")?);
        }

        if let Some(ref base_url) = self.media.base_url {
            self.media.base_url = Some(expand::expand_env(base_url, "media.base_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store_resolved = StoreConfig {
            data_dir: config_dir.join(self.store.data_dir.as_deref().unwrap_or("data")),
        };
    }
}
