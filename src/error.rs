use crate::services::transport::{Operation, TransportError};
use std::fmt;
use thiserror::Error;

/// One of the five required configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Wsdl,
    ApiKey,
    SiteUrl,
    SiteId,
    ReturnFormat,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::Wsdl,
        ConfigField::ApiKey,
        ConfigField::SiteUrl,
        ConfigField::SiteId,
        ConfigField::ReturnFormat,
    ];

    /// Key under the `supercollege` configuration namespace
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::Wsdl => "wsdl",
            ConfigField::ApiKey => "api_key",
            ConfigField::SiteUrl => "site_url",
            ConfigField::SiteId => "site_id",
            ConfigField::ReturnFormat => "api_return_format",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Wsdl => "WSDL location",
            ConfigField::ApiKey => "API key",
            ConfigField::SiteUrl => "site URL",
            ConfigField::SiteId => "site ID",
            ConfigField::ReturnFormat => "return format",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (supercollege.{})", self.label(), self.key())
    }
}

/// Errors surfaced by the SuperCollege client
#[derive(Debug, Error)]
pub enum SuperCollegeError {
    #[error("SuperCollege {field} is not set in configuration")]
    Config { field: ConfigField },

    #[error("SuperCollege connection failed: {0}")]
    Connection(#[source] TransportError),

    #[error("{cause} - SOAP error on {operation} method")]
    RemoteCall {
        operation: Operation,
        #[source]
        cause: TransportError,
    },
}

impl SuperCollegeError {
    pub fn remote(operation: Operation, cause: TransportError) -> Self {
        Self::RemoteCall { operation, cause }
    }

    /// The missing configuration value, if this is a configuration error
    pub fn config_field(&self) -> Option<ConfigField> {
        match self {
            SuperCollegeError::Config { field } => Some(*field),
            _ => None,
        }
    }
}
