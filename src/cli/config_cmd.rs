use anyhow::{Context, Result};

use crate::config::{AuthMode, Config};

use super::args::ConfigArgs;
use super::util::mask_api_key;

pub(crate) fn handle_config(args: &ConfigArgs, config: &mut Config) -> Result<()> {
    let mut updated = config.clone();

    if let Some(ref api_key) = args.api_key {
        updated.provider.api_key = Some(api_key.trim().to_string()).filter(|key| !key.is_empty());
    }

    if let Some(ref model) = args.model {
        updated.provider.model = model.clone();
    }

    if let Some(timeout) = args.timeout {
        updated.provider.timeout_secs = timeout;
    }

    if let Some(ref base_url) = args.base_url {
        updated.provider.base_url = base_url.clone();
    }

    if let Some(ref mode) = args.auth_mode {
        updated.provider.auth_mode = mode
            .parse::<AuthMode>()
            .with_context(|| format!("Invalid --auth-mode value '{mode}'"))?;
    }

    updated.validate()?;
    updated.save()?;
    *config = updated;

    println!(
        "✅ Configuration saved to {}",
        Config::config_path()?.display()
    );
    println!("📋 Current configuration:");
    println!("   Base URL: {}", config.provider.base_url);
    println!("   Model: {}", config.provider.model);
    println!("   Auth Mode: {}", config.provider.auth_mode);
    println!(
        "   API Key: {}",
        mask_api_key(config.provider.api_key.as_deref().unwrap_or_default())
    );
    println!("   Timeout: {}s", config.provider.timeout_secs);
    println!("   Listen: {}:{}", config.server.bind, config.server.port);

    Ok(())
}
