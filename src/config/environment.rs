use anyhow::{Context, Result, anyhow};
use std::env;

use super::builder::ConfigBuilder;
use super::types::AuthMode;

pub fn apply_env_overrides(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(api_key) = env_string("GEMINI_API_KEY")? {
        if !api_key.trim().is_empty() {
            builder = builder.with_provider(|provider| provider.api_key = Some(api_key));
        }
    }

    if let Some(base_url) = env_string("STUDYPLAN_BASE_URL")? {
        builder = builder.with_provider(|provider| provider.base_url = base_url);
    }

    if let Some(model) = env_string("STUDYPLAN_MODEL")? {
        builder = builder.with_provider(|provider| provider.model = model);
    }

    if let Some(mode_raw) = env_string("STUDYPLAN_AUTH_MODE")? {
        let mode = mode_raw
            .parse::<AuthMode>()
            .with_context(|| format!("Failed to parse STUDYPLAN_AUTH_MODE value '{mode_raw}'"))?;
        builder = builder.with_provider(|provider| provider.auth_mode = mode);
    }

    if let Some(timeout) = env_u64("STUDYPLAN_TIMEOUT_SECS")? {
        builder = builder.with_provider(|provider| provider.timeout_secs = timeout);
    }

    if let Some(bind) = env_string("STUDYPLAN_BIND")? {
        builder = builder.with_server(|server| server.bind = bind);
    }

    if let Some(port) = env_u16("STUDYPLAN_PORT")? {
        builder = builder.with_server(|server| server.port = port);
    }

    if let Some(markdown) = env_bool("STUDYPLAN_MARKDOWN")? {
        builder = builder.with_prompt(|prompt| prompt.markdown = markdown);
    }

    Ok(builder)
}

pub fn env_string(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(anyhow!("{key} contains invalid UTF-8")),
    }
}

pub fn env_u64(key: &str) -> Result<Option<u64>> {
    if let Some(value) = env_string(key)? {
        let parsed = value
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {key} as u64"))?;
        Ok(Some(parsed))
    } else {
        Ok(None)
    }
}

pub fn env_u16(key: &str) -> Result<Option<u16>> {
    if let Some(value) = env_string(key)? {
        let parsed = value
            .parse::<u16>()
            .with_context(|| format!("Failed to parse {key} as a port number"))?;
        Ok(Some(parsed))
    } else {
        Ok(None)
    }
}

pub fn env_bool(key: &str) -> Result<Option<bool>> {
    match env_string(key)? {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(anyhow!("Failed to parse {key} value '{other}' as a boolean")),
        },
        None => Ok(None),
    }
}
