use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::wizard::FormSession;

/// Stored CLI session: where the server lives and who we are signed in
/// as. The bearer token lives here between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub email: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            token: None,
            email: None,
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("INTERN_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("intern").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session_config() -> anyhow::Result<SessionConfig> {
    let config_dir = get_config_dir()?;
    let session_file = config_dir.join("session.json");

    if !session_file.exists() {
        return Ok(SessionConfig::default());
    }

    let content = fs::read_to_string(session_file)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_session_config(config: &SessionConfig) -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let session_file = config_dir.join("session.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(session_file, content)?;
    Ok(())
}

/// The in-progress wizard session is serialized between steps so an
/// interrupted application can be resumed later.
pub fn load_wizard_session() -> anyhow::Result<Option<FormSession>> {
    let config_dir = get_config_dir()?;
    let wizard_file = config_dir.join("wizard.json");

    if !wizard_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(wizard_file)?;
    let session: FormSession = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_wizard_session(session: &FormSession) -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let wizard_file = config_dir.join("wizard.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(wizard_file, content)?;
    Ok(())
}

pub fn clear_wizard_session() -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let wizard_file = config_dir.join("wizard.json");

    if wizard_file.exists() {
        fs::remove_file(wizard_file)?;
    }
    Ok(())
}
