use crate::error::{ConfigField, SuperCollegeError};
use crate::services::ConnectionOptions;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub supercollege: SuperCollegeSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// The `supercollege` namespace
///
/// The five required values stay optional here so that a missing value is
/// reported by [`SuperCollegeSettings::validate`] with the field it concerns.
#[derive(Debug, Clone, Deserialize)]
pub struct SuperCollegeSettings {
    pub wsdl: Option<String>,
    pub api_key: Option<String>,
    pub site_url: Option<String>,
    pub site_id: Option<String>,
    pub api_return_format: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_trace")]
    pub trace: bool,
}

impl Default for SuperCollegeSettings {
    fn default() -> Self {
        Self {
            wsdl: None,
            api_key: None,
            site_url: None,
            site_id: None,
            api_return_format: None,
            timeout_secs: default_timeout_secs(),
            trace: default_trace(),
        }
    }
}

fn default_timeout_secs() -> u64 { 30 }
fn default_trace() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

/// Validated connection values
///
/// Only obtainable through [`SuperCollegeSettings::validate`], so every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    wsdl: String,
    api_key: String,
    site_url: String,
    site_id: String,
    return_format: String,
}

impl Credentials {
    pub fn wsdl(&self) -> &str { &self.wsdl }
    pub fn api_key(&self) -> &str { &self.api_key }
    pub fn site_url(&self) -> &str { &self.site_url }
    pub fn site_id(&self) -> &str { &self.site_id }
    pub fn return_format(&self) -> &str { &self.return_format }
}

impl SuperCollegeSettings {
    /// Read the namespace from a key-value store by string path
    pub fn from_config(config: &Config) -> Self {
        let get = |key: &str| config.get_string(&format!("supercollege.{}", key)).ok();
        Self {
            wsdl: get(ConfigField::Wsdl.key()),
            api_key: get(ConfigField::ApiKey.key()),
            site_url: get(ConfigField::SiteUrl.key()),
            site_id: get(ConfigField::SiteId.key()),
            api_return_format: get(ConfigField::ReturnFormat.key()),
            timeout_secs: config
                .get_int("supercollege.timeout_secs")
                .ok()
                .and_then(|secs| u64::try_from(secs).ok())
                .unwrap_or_else(default_timeout_secs),
            trace: config.get_bool("supercollege.trace").unwrap_or_else(|_| default_trace()),
        }
    }

    pub fn value(&self, field: ConfigField) -> Option<&str> {
        match field {
            ConfigField::Wsdl => self.wsdl.as_deref(),
            ConfigField::ApiKey => self.api_key.as_deref(),
            ConfigField::SiteUrl => self.site_url.as_deref(),
            ConfigField::SiteId => self.site_id.as_deref(),
            ConfigField::ReturnFormat => self.api_return_format.as_deref(),
        }
    }

    /// Check the five required values, in declaration order
    ///
    /// Absent and empty values are the same failure.
    pub fn validate(&self) -> Result<Credentials, SuperCollegeError> {
        let required = |field: ConfigField| match self.value(field) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(SuperCollegeError::Config { field }),
        };

        Ok(Credentials {
            wsdl: required(ConfigField::Wsdl)?,
            api_key: required(ConfigField::ApiKey)?,
            site_url: required(ConfigField::SiteUrl)?,
            site_id: required(ConfigField::SiteId)?,
            return_format: required(ConfigField::ReturnFormat)?,
        })
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            trace: self.trace,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ConnectionOptions::default()
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SUPERCOLLEGE__)
    /// 5. Flat variables such as SUPERCOLLEGE_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a single file (`--config <path>`)
    ///
    /// Replaces the default/local files; environment variables still apply on top.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }
}

// e.g., SUPERCOLLEGE__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix("SUPERCOLLEGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Map the flat `SUPERCOLLEGE_*` variables onto their config keys
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    const FLAT_VARS: [(&str, ConfigField); 5] = [
        ("SUPERCOLLEGE_WSDL", ConfigField::Wsdl),
        ("SUPERCOLLEGE_API_KEY", ConfigField::ApiKey),
        ("SUPERCOLLEGE_SITE_URL", ConfigField::SiteUrl),
        ("SUPERCOLLEGE_SITE_ID", ConfigField::SiteId),
        ("SUPERCOLLEGE_RETURN_FORMAT", ConfigField::ReturnFormat),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, field) in FLAT_VARS {
        if let Ok(value) = std::env::var(var) {
            builder = builder.set_override(format!("supercollege.{}", field.key()), value)?;
        }
    }
    builder.build()
}
