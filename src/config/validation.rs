use anyhow::{Result, bail};

use super::types::Config;

pub fn validate(config: &Config) -> Result<()> {
    if config.provider.base_url.trim().is_empty() {
        bail!("Provider base URL cannot be empty");
    }
    if config.provider.model.trim().is_empty() {
        bail!("Provider model cannot be empty");
    }
    if config.provider.timeout_secs == 0 {
        bail!("Provider timeout must be greater than zero seconds");
    }
    Ok(())
}
