use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log: Log,
    pub store: Store,
    pub oauth: OAuth,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "mysql"
    #[serde(default)]
    pub dsn: Option<String>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend)
            .field("dsn", &self.dsn.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct OAuth {
    pub refresh_token_revoked_on_use: bool,
    #[serde(default)]
    pub refresh_token_revoke_in_secs: u64,
    #[serde(default = "default_true")]
    pub use_refresh_token: bool,
    /// Omit for non-expiring access tokens.
    #[serde(default)]
    pub access_token_expires_in_secs: Option<u64>,
    #[serde(default = "default_secret_strategy")]
    pub client_secret_strategy: String, // "plain", "sha256" or "argon2"
    /// Client uid to lifetime in seconds.
    #[serde(default)]
    pub custom_access_token_expires_in: HashMap<String, u64>,
}

fn default_true() -> bool {
    true
}

fn default_secret_strategy() -> String {
    "plain".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("TOKENROT").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
