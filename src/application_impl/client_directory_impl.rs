use crate::application_port::OAuthError;
use crate::domain_model::Client;
use crate::domain_port::{ClientDirectory, ClientRepo, SecretHasher};
use std::sync::Arc;
use tracing::debug;

pub struct RealClientDirectory {
    client_repo: Arc<dyn ClientRepo>,
    secret_hasher: Arc<dyn SecretHasher>,
}

impl RealClientDirectory {
    pub fn new(client_repo: Arc<dyn ClientRepo>, secret_hasher: Arc<dyn SecretHasher>) -> Self {
        Self {
            client_repo,
            secret_hasher,
        }
    }
}

#[async_trait::async_trait]
impl ClientDirectory for RealClientDirectory {
    async fn find_by_credentials(
        &self,
        uid: &str,
        secret: &str,
    ) -> Result<Option<Client>, OAuthError> {
        let Some(client) = self.client_repo.get_by_uid(uid).await? else {
            debug!(uid, "unknown client uid");
            return Ok(None);
        };

        if self
            .secret_hasher
            .verify_secret(secret, &client.secret)
            .await?
        {
            Ok(Some(client))
        } else {
            debug!(uid, "client secret mismatch");
            Ok(None)
        }
    }
}
