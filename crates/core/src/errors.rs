use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid drink `{name}`: {reason}")]
    InvalidDrink { name: String, reason: String },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid recommendation request: {0}")]
    InvalidRequest(String),
}

impl DomainError {
    pub fn invalid_drink(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDrink { name: name.into(), reason: reason.into() }
    }

    /// Stable short code used in logs and fallback reasons.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDrink { .. } => "invalid_drink",
            Self::MissingField(_) => "missing_field",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("could not read input `{path}`: {message}")]
    Input { path: String, message: String },
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl ApplicationError {
    /// Error class reported by operator tooling.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Configuration(_) => "config_validation",
            Self::Input { .. } => "input",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Domain(_) | Self::Input { .. } => 3,
            Self::Serialization(_) => 4,
        }
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value.to_string())
    }
}
