use super::{RefreshTokenRequest, ServerContext};
use crate::application_port::*;
use crate::domain_model::*;

pub struct RealTokenRotationService {
    server: ServerContext,
}

impl RealTokenRotationService {
    pub fn new(server: ServerContext) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &ServerContext {
        &self.server
    }
}

#[async_trait::async_trait]
impl TokenRotationService for RealTokenRotationService {
    async fn rotate(
        &self,
        credentials: Option<Credentials>,
        params: RotationParams,
    ) -> Result<AccessToken, OAuthError> {
        let refresh_token = match params.refresh_token.as_deref() {
            Some(value) if !value.trim().is_empty() => {
                self.server.token_repo.find_by_refresh_token(value).await?
            }
            _ => None,
        };

        RefreshTokenRequest::new(&self.server, refresh_token, credentials, params)
            .await?
            .authorize()
            .await
    }
}
