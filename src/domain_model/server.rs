use std::collections::HashMap;
use std::time::Duration;

/// Deployment policy for token issuing and rotation.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Revoke a refresh token as soon as it is rotated. When off, the
    /// superseded token stays valid for `refresh_token_revoke_in`.
    pub refresh_token_revoked_on_use: bool,
    pub refresh_token_revoke_in: Duration,
    /// Whether newly issued tokens carry a refresh token.
    pub use_refresh_token: bool,
    /// Default access token lifetime, `None` for non-expiring tokens.
    pub access_token_expires_in: Option<Duration>,
    /// Per-client lifetime overrides, keyed by client uid.
    pub custom_access_token_expires_in: HashMap<String, Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            refresh_token_revoked_on_use: true,
            refresh_token_revoke_in: Duration::ZERO,
            use_refresh_token: true,
            access_token_expires_in: Some(Duration::from_secs(2 * 60 * 60)),
            custom_access_token_expires_in: HashMap::new(),
        }
    }
}
