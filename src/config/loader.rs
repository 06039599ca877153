use anyhow::{Context, Result};
use dirs::home_dir;
use std::{fs, path::Path};

use super::Config;
use super::builder::ConfigBuilder;
use super::environment::apply_env_overrides;
use super::types::{AuthMode, FileConfig, PersistedConfig};
use super::validation::validate;

impl Config {
    pub fn config_path() -> Result<std::path::PathBuf> {
        let mut path = home_dir().context("Could not determine home directory")?;
        path.push(".studyplan/config");
        Ok(path)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut builder = ConfigBuilder::new();

        if path.exists() {
            builder = Self::apply_file(builder, &path)?;
        }

        builder = apply_env_overrides(builder)?;

        let config = builder.build()?;
        validate(&config)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let payload = PersistedConfig::from(self);
        let json = serde_json::to_string_pretty(&payload)
            .context("Failed to serialize configuration to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate(self)
    }

    fn apply_file(builder: ConfigBuilder, path: &Path) -> Result<ConfigBuilder> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(builder);
        }

        let file: FileConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing JSON config at {}", path.display()))?;

        file.apply(builder)
    }
}

impl FileConfig {
    pub fn apply(self, builder: ConfigBuilder) -> Result<ConfigBuilder> {
        let auth_mode = self
            .provider
            .auth_mode
            .as_deref()
            .map(str::parse::<AuthMode>)
            .transpose()
            .context("Invalid provider.auth_mode in config file")?;

        let builder = builder.with_provider(|provider| {
            if let Some(base_url) = self.provider.base_url {
                provider.base_url = base_url;
            }
            if let Some(model) = self.provider.model {
                provider.model = model;
            }
            if let Some(mode) = auth_mode {
                provider.auth_mode = mode;
            }
            if let Some(api_key) = self.provider.api_key.filter(|key| !key.trim().is_empty()) {
                provider.api_key = Some(api_key);
            }
            if let Some(timeout) = self.provider.timeout_secs {
                provider.timeout_secs = timeout;
            }
            if let Some(user_agent) = self.provider.user_agent {
                provider.user_agent = user_agent;
            }
        });

        let builder = builder.with_server(|server| {
            if let Some(bind) = self.server.bind {
                server.bind = bind;
            }
            if let Some(port) = self.server.port {
                server.port = port;
            }
        });

        Ok(builder.with_prompt(|prompt| {
            if let Some(markdown) = self.prompt.markdown {
                prompt.markdown = markdown;
            }
        }))
    }
}
