//! Configuration system (env > `.env` file > defaults).

use std::fmt;

use crate::error::{AppError, Result};

/// Default Microsoft Learn MCP endpoint (streamable HTTP).
pub const DEFAULT_MCP_ENDPOINT: &str = "https://learn.microsoft.com/api/mcp";

/// Default Azure OpenAI data-plane API version.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_MCP_ENDPOINT: &str = "LEARN_MCP_ENDPOINT";

/// Resolved application configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Azure OpenAI resource endpoint, e.g. `https://myresource.openai.azure.com`.
    pub azure_endpoint: String,
    /// Chat model deployment name.
    pub deployment: String,
    /// API key; `None` means authenticate through the Azure CLI.
    pub api_key: Option<String>,
    pub api_version: String,
    pub mcp_endpoint: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("azure_endpoint", &self.azure_endpoint)
            .field("deployment", &self.deployment)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("api_version", &self.api_version)
            .field("mcp_endpoint", &self.mcp_endpoint)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let azure_endpoint = get(ENV_ENDPOINT).ok_or_else(|| AppError::missing(ENV_ENDPOINT))?;
        let deployment = get(ENV_DEPLOYMENT).ok_or_else(|| AppError::missing(ENV_DEPLOYMENT))?;

        if !azure_endpoint.starts_with("http://") && !azure_endpoint.starts_with("https://") {
            return Err(AppError::Configuration(format!(
                "{ENV_ENDPOINT} must be an http(s) URL, got '{azure_endpoint}'"
            )));
        }

        Ok(Self {
            azure_endpoint,
            deployment,
            api_key: get(ENV_API_KEY),
            api_version: get(ENV_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            mcp_endpoint: get(ENV_MCP_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_MCP_ENDPOINT.to_string()),
        })
    }

    /// Override the MCP endpoint (e.g. from a CLI flag).
    pub fn with_mcp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.mcp_endpoint = endpoint.into();
        self
    }
}
