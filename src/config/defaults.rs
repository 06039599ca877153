use super::constants::*;
use super::types::{AuthMode, PromptSettings, ProviderSettings, ServerSettings};

pub fn default_user_agent() -> String {
    format!("studyplan/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            auth_mode: AuthMode::QueryParam,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self { markdown: true }
    }
}
