//! Configuration loading and typed config structures.
//!
//! The configuration lives in `supers-config.yaml` in the working
//! directory. Every field has a default, so the file is optional and a
//! partial file only overrides what it names. A handful of environment
//! variables take precedence over the file so deployments can adjust
//! the bind address and watched file without editing YAML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

/// Default name of the configuration file.
pub const CONFIG_FILE: &str = "supers-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {message}")]
    InvalidEnv {
        /// Name of the environment variable.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `supers-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupersConfig {
    /// HTTP bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Watched file and poll cadence.
    #[serde(default)]
    pub watch: WatchConfig,

    /// Super text ingest endpoint.
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl SupersConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, and
    /// [`ConfigError::InvalidEnv`] / [`ConfigError::Invalid`] for bad
    /// overrides or values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Same as [`SupersConfig::from_file`] minus the I/O case.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise start from defaults.
    ///
    /// Environment overrides and validation apply in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the process environment when set.
    ///
    /// - `SUPERS_HOST` -- bind host
    /// - `SUPERS_PORT` -- bind port
    /// - `SUPERS_WATCH_PATH` -- watched file
    /// - `SUPERS_POLL_INTERVAL_MS` -- poll interval in milliseconds
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// [`SupersConfig::apply_env_overrides`] passes the process
    /// environment; tests pass a map.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SUPERS_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("SUPERS_PORT") {
            self.server.port = val.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "SUPERS_PORT",
                message: format!("{e}"),
            })?;
        }
        if let Some(val) = lookup("SUPERS_WATCH_PATH") {
            self.watch.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("SUPERS_POLL_INTERVAL_MS") {
            self.watch.poll_interval_ms = val.parse().map_err(|e| ConfigError::InvalidEnv {
                name: "SUPERS_POLL_INTERVAL_MS",
                message: format!("{e}"),
            })?;
        }
        Ok(())
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(String::from(
                "watch.poll_interval_ms must be greater than zero",
            )));
        }
        if self.watch.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "watch.path must not be empty",
            )));
        }
        Ok(())
    }
}

/// HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Watched file settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchConfig {
    /// File whose trimmed content is streamed, relative to the working
    /// directory unless absolute.
    #[serde(default = "default_watch_path")]
    pub path: PathBuf,

    /// Milliseconds between two polls on each connection.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl WatchConfig {
    /// The poll interval as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            path: default_watch_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Super text ingest settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
    /// Whether `POST /super` may overwrite the watched file.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_watch_path() -> PathBuf {
    PathBuf::from("super.txt")
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}
