use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ai: AiConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = if let Some(path) = path {
            let data = std::fs::read_to_string(path).map_err(|e| {
                AppError::usage(format!("failed to read config {}: {e}", path.display()))
            })?;
            serde_yaml::from_str::<Config>(&data).map_err(|e| {
                AppError::usage(format!("failed to parse config {}: {e}", path.display()))
            })?
        } else {
            Config::default()
        };

        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.server.validate()?;
        self.ai.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> AppResult<()> {
        parse_bind("server.bind", &self.bind).map(|_| ())
    }

    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        parse_bind("server.bind", &self.bind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AppError::usage("ai.endpoint must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::usage("ai.model must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::usage("ai.timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn is_mock(&self) -> bool {
        self.endpoint.starts_with("mock://")
    }
}

/// The provider credential comes from the environment, never from the
/// config file, and its absence is fatal before any socket is bound.
pub fn resolve_api_key() -> AppResult<String> {
    let key = std::env::var(API_KEY_ENV)
        .map_err(|_| AppError::usage(format!("{API_KEY_ENV} is not set; the AI provider requires a credential")))?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(AppError::usage(format!("{API_KEY_ENV} is empty")));
    }
    Ok(key)
}

fn parse_bind(field: &str, value: &str) -> AppResult<SocketAddr> {
    SocketAddr::from_str(value)
        .map_err(|_| AppError::usage(format!("invalid {field} '{value}'; expected ip:port")))
}
