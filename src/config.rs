use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

use lubelog_core::Credentials;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// LubeLogger server connection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server address (e.g., "lubelogger.local:8080" or "https://cars.example.com")
    pub domain: Option<String>,
    pub username: Option<String>,
    #[serde(serialize_with = "mask_password")]
    pub password: Option<String>,
}

impl ServerConfig {
    /// Returns credentials when domain, username and password are all set
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.domain, &self.username, &self.password) {
            (Some(domain), Some(username), Some(password)) if !domain.trim().is_empty() => {
                Some(Credentials::new(domain, username.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

fn mask_password<S: Serializer>(password: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match password {
        Some(_) => s.serialize_str("********"),
        None => s.serialize_none(),
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the offline queue, vehicle cache and settings
    pub data_dir: ConfigValue<PathBuf>,
    /// Seconds before an unanswered request counts as unreachable
    pub request_timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub server: ServerConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    server: Option<ServerConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut request_timeout_secs =
            ConfigValue::new(lubelog_core::DEFAULT_TIMEOUT.as_secs(), ConfigSource::Default);
        let mut config_file = None;
        let mut server = ServerConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                if secs == 0 {
                    return Err(ConfigError::InvalidValue("request_timeout_secs", secs.to_string()));
                }
                request_timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(server_config) = file_config.server {
                server = server_config;
            }
        }

        if let Ok(dir) = std::env::var("LUBELOG_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("LUBELOG_TIMEOUT_SECS") {
            // A zero timeout would fail every request at once.
            let parsed = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&parsed| parsed > 0)
                .ok_or_else(|| ConfigError::InvalidValue("LUBELOG_TIMEOUT_SECS", secs.clone()))?;
            request_timeout_secs = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(domain) = std::env::var("LUBELOG_DOMAIN") {
            server.domain = Some(domain);
        }
        if let Ok(username) = std::env::var("LUBELOG_USERNAME") {
            server.username = Some(username);
        }
        if let Ok(password) = std::env::var("LUBELOG_PASSWORD") {
            server.password = Some(password);
        }

        Ok(Self {
            data_dir,
            request_timeout_secs,
            config_file,
            server,
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/lubelog/
    /// - macOS: ~/Library/Application Support/lubelog/
    /// - Windows: %APPDATA%/lubelog/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lubelog")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/lubelog/
    /// - macOS: ~/Library/Application Support/lubelog/
    /// - Windows: %APPDATA%/lubelog/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lubelog")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
