use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait ClientRepo: Send + Sync {
    async fn get_by_uid(&self, uid: &str) -> Result<Option<Client>, OAuthError>;
}

/// Resolves presented credentials to a registered client.
#[async_trait::async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn find_by_credentials(
        &self,
        uid: &str,
        secret: &str,
    ) -> Result<Option<Client>, OAuthError>;
}

/// Checks a presented client secret against its stored form.
#[async_trait::async_trait]
pub trait SecretHasher: Send + Sync {
    async fn hash_secret(&self, secret: &str) -> Result<String, OAuthError>;
    async fn verify_secret(&self, secret: &str, stored: &str) -> Result<bool, OAuthError>;
}
