use crate::application_port::OAuthError;
use crate::domain_model::{ServerConfig, TokenId};
use crate::domain_port::{Clock, StorageTx, TokenRepo};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Revocation behaviour shared by token-like entities.
///
/// Implementors only expose their revocation fields; the provided methods
/// write every change through the [`TokenRepo`] inside the caller's
/// transaction before updating the in-memory value.
#[async_trait::async_trait]
pub trait Revocable: Send + Sync {
    fn token_id(&self) -> TokenId;
    fn revoked_at(&self) -> Option<DateTime<Utc>>;
    fn set_revoked_at(&mut self, at: DateTime<Utc>);
    fn previous_refresh_token(&self) -> Option<&str>;
    fn clear_previous_refresh_token(&mut self);

    /// A token revoked at a future instant is not revoked yet.
    fn is_revoked(&self, clock: &dyn Clock) -> bool {
        self.revoked_at().is_some_and(|at| at <= clock.now())
    }

    async fn revoke<'t>(
        &mut self,
        tx: &mut dyn StorageTx<'t>,
        repo: &dyn TokenRepo,
        clock: &dyn Clock,
    ) -> Result<(), OAuthError> {
        let now = clock.now();
        repo.update_revoked_at_in_tx(tx, self.token_id(), now).await?;
        self.set_revoked_at(now);
        Ok(())
    }

    /// Schedule revocation `delay` from now.
    async fn revoke_in<'t>(
        &mut self,
        tx: &mut dyn StorageTx<'t>,
        repo: &dyn TokenRepo,
        clock: &dyn Clock,
        delay: Duration,
    ) -> Result<(), OAuthError> {
        let delay = chrono::Duration::from_std(delay)
            .map_err(|e| OAuthError::InternalError(format!("revoke delay: {e}")))?;
        let at = clock.now() + delay;
        repo.update_revoked_at_in_tx(tx, self.token_id(), at).await?;
        self.set_revoked_at(at);
        Ok(())
    }

    /// Retire the refresh token this token superseded, after the grace
    /// period. Only applies when rotation does not revoke on use. A
    /// predecessor that already carries a revocation time is left as is. The
    /// link is consumed even if the predecessor no longer exists.
    async fn revoke_predecessor_if_configured<'t>(
        &mut self,
        tx: &mut dyn StorageTx<'t>,
        repo: &dyn TokenRepo,
        clock: &dyn Clock,
        config: &ServerConfig,
    ) -> Result<(), OAuthError> {
        if config.refresh_token_revoked_on_use {
            return Ok(());
        }
        let Some(previous) = self.previous_refresh_token().map(str::to_owned) else {
            return Ok(());
        };

        if let Some(mut predecessor) = repo.find_by_refresh_token_in_tx(tx, &previous).await? {
            if predecessor.revoked_at().is_none() {
                predecessor
                    .revoke_in(tx, repo, clock, config.refresh_token_revoke_in)
                    .await?;
            }
        }

        repo.clear_previous_refresh_token_in_tx(tx, self.token_id()).await?;
        self.clear_previous_refresh_token();
        Ok(())
    }
}

impl Revocable for crate::domain_model::AccessToken {
    fn token_id(&self) -> TokenId {
        self.id
    }

    fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    fn set_revoked_at(&mut self, at: DateTime<Utc>) {
        self.revoked_at = Some(at);
    }

    fn previous_refresh_token(&self) -> Option<&str> {
        self.previous_refresh_token
            .as_deref()
            .filter(|v| !v.is_empty())
    }

    fn clear_previous_refresh_token(&mut self) {
        self.previous_refresh_token = None;
    }
}
