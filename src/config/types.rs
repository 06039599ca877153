use anyhow::anyhow;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderSettings,
    pub server: ServerSettings,
    pub prompt: PromptSettings,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub model: String,
    pub auth_mode: AuthMode,
    /// Fallback key used when a caller does not send one.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// How the credential travels to the generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[serde(rename = "query")]
    QueryParam,
    Bearer,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::QueryParam => write!(f, "query"),
            AuthMode::Bearer => write!(f, "bearer"),
        }
    }
}

impl std::str::FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(AuthMode::QueryParam),
            "bearer" => Ok(AuthMode::Bearer),
            other => Err(anyhow!("Unknown auth mode '{other}' (expected 'query' or 'bearer')")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct PromptSettings {
    /// Ask the model to answer with markdown headings, lists and emphasis.
    pub markdown: bool,
}

// File configuration types
#[derive(Debug, Default, Deserialize)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub provider: FileProviderSettings,
    #[serde(default)]
    pub server: FileServerSettings,
    #[serde(default)]
    pub prompt: FilePromptSettings,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileProviderSettings {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub auth_mode: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileServerSettings {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FilePromptSettings {
    pub markdown: Option<bool>,
}

// Serialization helpers
#[derive(Serialize)]
pub(super) struct PersistedConfig<'a> {
    pub provider: PersistedProvider<'a>,
    pub server: PersistedServer<'a>,
    pub prompt: PersistedPrompt,
}

#[derive(Serialize)]
pub(super) struct PersistedProvider<'a> {
    pub base_url: &'a str,
    pub model: &'a str,
    pub auth_mode: AuthMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
    pub timeout_secs: u64,
    pub user_agent: &'a str,
}

#[derive(Serialize)]
pub(super) struct PersistedServer<'a> {
    pub bind: &'a str,
    pub port: u16,
}

#[derive(Serialize)]
pub(super) struct PersistedPrompt {
    pub markdown: bool,
}

impl<'a> From<&'a Config> for PersistedConfig<'a> {
    fn from(config: &'a Config) -> Self {
        PersistedConfig {
            provider: PersistedProvider {
                base_url: &config.provider.base_url,
                model: &config.provider.model,
                auth_mode: config.provider.auth_mode,
                api_key: config.provider.api_key.as_deref(),
                timeout_secs: config.provider.timeout_secs,
                user_agent: &config.provider.user_agent,
            },
            server: PersistedServer {
                bind: &config.server.bind,
                port: config.server.port,
            },
            prompt: PersistedPrompt {
                markdown: config.prompt.markdown,
            },
        }
    }
}
