use crate::domain_model::{AccessToken, Credentials, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a token request. The first five variants are protocol
/// outcomes reported to the caller; `Store` and `InternalError` are
/// infrastructure faults.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid_request: {0}")]
    InvalidRequest(String),
    #[error("invalid_grant: {0}")]
    InvalidGrant(String),
    #[error("invalid_client: {0}")]
    InvalidClient(String),
    #[error("invalid_scope: {0}")]
    InvalidScope(String),
    /// A refresh token was redeemed again after it had already been rotated.
    #[error("reuse_detected: refresh token {0} was presented after rotation")]
    ReuseDetected(TokenId),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidRequest,
    InvalidGrant,
    InvalidClient,
    InvalidScope,
    ReuseDetected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::InvalidGrant => "invalid_grant",
            FailureKind::InvalidClient => "invalid_client",
            FailureKind::InvalidScope => "invalid_scope",
            FailureKind::ReuseDetected => "reuse_detected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OAuthError {
    /// Protocol failure kind, `None` for infrastructure errors.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            OAuthError::InvalidRequest(_) => Some(FailureKind::InvalidRequest),
            OAuthError::InvalidGrant(_) => Some(FailureKind::InvalidGrant),
            OAuthError::InvalidClient(_) => Some(FailureKind::InvalidClient),
            OAuthError::InvalidScope(_) => Some(FailureKind::InvalidScope),
            OAuthError::ReuseDetected(_) => Some(FailureKind::ReuseDetected),
            OAuthError::Store(_) | OAuthError::InternalError(_) => None,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            OAuthError::InvalidRequest(d)
            | OAuthError::InvalidGrant(d)
            | OAuthError::InvalidClient(d)
            | OAuthError::InvalidScope(d) => d.clone(),
            OAuthError::ReuseDetected(_) => {
                "The refresh token has already been used and was revoked.".to_string()
            }
            // Infrastructure details stay in the logs.
            OAuthError::Store(_) | OAuthError::InternalError(_) => {
                "The authorization server encountered an unexpected condition.".to_string()
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.kind().map_or("server_error", |k| k.as_str()),
            error_description: self.detail(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub error_description: String,
}

/// Request parameters of a refresh-token grant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RotationParams {
    pub scope: Option<String>,
    /// Alias of `scope`; `scope` wins when both are present.
    pub scopes: Option<String>,
    pub refresh_token: Option<String>,
}

impl RotationParams {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        RotationParams {
            refresh_token: Some(refresh_token.into()),
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Requested scope string, or `None` when the caller asked for no
    /// narrowing.
    pub fn requested_scope(&self) -> Option<&str> {
        self.scope
            .as_deref()
            .or(self.scopes.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Successful token response body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,
    pub created_at: i64,
}

impl From<&AccessToken> for TokenResponse {
    fn from(token: &AccessToken) -> Self {
        TokenResponse {
            access_token: token.token.clone(),
            token_type: "Bearer",
            expires_in: token.expires_in.map(|d| d.as_secs()),
            refresh_token: token.refresh_token_value().map(str::to_owned),
            scope: token.scopes.to_string(),
            created_at: token.created_at.timestamp(),
        }
    }
}

#[async_trait::async_trait]
pub trait TokenRotationService: Send + Sync {
    /// Exchange the refresh token named in `params` for a new token.
    async fn rotate(
        &self,
        credentials: Option<Credentials>,
        params: RotationParams,
    ) -> Result<AccessToken, OAuthError>;
}
