//! Runtime configuration for the assistant front end.
//!
//! Values come from environment lookups so tests can feed a closure instead of
//! touching the process environment.

use dioxus::logger::tracing::Level;
use reqwest::Method;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const API_BASE_VAR: &str = "ASK_API_BASE";
pub const LOG_LEVEL_VAR: &str = "ASK_LOG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),
}

/// Where and how to reach the question-answering service.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub url: String,
    pub method: Method,
}

impl EndpointDescriptor {
    /// Accepts the method in any case, e.g. `"post"`.
    pub fn new(url: impl Into<String>, method: &str) -> Result<Self, ConfigError> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigError::InvalidMethod(method.to_string()))?;
        Ok(Self {
            url: url.into(),
            method,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            log_level: Level::WARN,
        }
    }
}

impl AppConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match key {
            API_BASE_VAR => option_env!("ASK_API_BASE").map(str::to_string),
            LOG_LEVEL_VAR => option_env!("ASK_LOG").map(str::to_string),
            _ => None,
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup(API_BASE_VAR)
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(level) => level
                .trim()
                .parse::<Level>()
                .map_err(|_| ConfigError::InvalidLogLevel(level))?,
            None => Level::WARN,
        };
        Ok(Self {
            api_base,
            log_level,
        })
    }

    pub fn ask_endpoint(&self) -> EndpointDescriptor {
        EndpointDescriptor {
            url: format!("{}/ask", self.api_base),
            method: Method::POST,
        }
    }
}
