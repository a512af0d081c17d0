use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait TokenRepo: Send + Sync {
    /// Most recently created token carrying this refresh value.
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError>;

    async fn find_by_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError>;

    /// Tokens that recorded `previous_refresh_token` as their predecessor,
    /// oldest first.
    async fn find_by_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        previous_refresh_token: &str,
    ) -> Result<Vec<AccessToken>, OAuthError>;

    /// Take an exclusive lock on the row and return its current state.
    /// Blocks while another transaction holds the lock.
    async fn lock_for_update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<Option<AccessToken>, OAuthError>;

    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        token: &AccessToken,
    ) -> Result<(), OAuthError>;

    async fn update_revoked_at_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), OAuthError>;

    async fn clear_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<(), OAuthError>;
}
