use crate::domain_model::{ClientId, Scopes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct TokenId(pub uuid::Uuid);

impl TokenId {
    pub fn new_v4() -> Self {
        TokenId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TokenId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(TokenId)
    }
}

/// An issued access token. A token holding a `refresh_token` value also acts
/// as the refresh token for rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: TokenId,
    pub token: String,
    pub refresh_token: Option<String>,
    pub application_id: Option<ClientId>,
    pub resource_owner_id: Option<String>,
    pub scopes: Scopes,
    /// `None` means the token never expires.
    pub expires_in: Option<Duration>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Refresh value this token superseded, until the predecessor is retired.
    pub previous_refresh_token: Option<String>,
    pub uses_refresh_token: bool,
}

impl AccessToken {
    /// Refresh value, ignoring empty strings left behind by older rows.
    pub fn refresh_token_value(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|v| !v.is_empty())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expires_in = chrono::Duration::from_std(self.expires_in?).ok()?;
        self.created_at.checked_add_signed(expires_in)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}
