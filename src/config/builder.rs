use anyhow::Result;

use super::types::{Config, PromptSettings, ProviderSettings, ServerSettings};

#[derive(Debug)]
pub struct ConfigBuilder {
    pub(super) provider: ProviderSettings,
    pub(super) server: ServerSettings,
    pub(super) prompt: PromptSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            provider: ProviderSettings::default(),
            server: ServerSettings::default(),
            prompt: PromptSettings::default(),
        }
    }

    pub fn with_provider<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ProviderSettings),
    {
        update(&mut self.provider);
        self
    }

    pub fn with_server<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ServerSettings),
    {
        update(&mut self.server);
        self
    }

    pub fn with_prompt<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut PromptSettings),
    {
        update(&mut self.prompt);
        self
    }

    pub fn build(self) -> Result<Config> {
        Ok(Config {
            provider: self.provider,
            server: self.server,
            prompt: self.prompt,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
