use super::repo_tx_memory::MemoryDb;
use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct MemoryTokenRepo {
    db: Arc<MemoryDb>,
}

impl MemoryTokenRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryTokenRepo { db }
    }

    fn missing(id: TokenId) -> OAuthError {
        OAuthError::Store(format!("token {id} not found"))
    }
}

#[async_trait::async_trait]
impl TokenRepo for MemoryTokenRepo {
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError> {
        Ok(self
            .db
            .committed()
            .values()
            .filter(|t| t.refresh_token.as_deref() == Some(refresh_token))
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn find_by_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;
        Ok(tx
            .scan(|t| t.refresh_token.as_deref() == Some(refresh_token))
            .pop())
    }

    async fn find_by_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        previous_refresh_token: &str,
    ) -> Result<Vec<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;
        Ok(tx.scan(|t| t.previous_refresh_token.as_deref() == Some(previous_refresh_token)))
    }

    async fn lock_for_update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<Option<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;
        tx.lock_row(id).await;
        Ok(tx.get(id))
    }

    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        token: &AccessToken,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;
        if tx.get(token.id).is_some() {
            return Err(OAuthError::Store(format!("duplicate token id {}", token.id)));
        }
        tx.stage(token.clone());
        Ok(())
    }

    async fn update_revoked_at_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;
        let mut row = tx.get(id).ok_or_else(|| Self::missing(id))?;
        row.revoked_at = Some(revoked_at);
        tx.stage(row);
        Ok(())
    }

    async fn clear_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;
        let mut row = tx.get(id).ok_or_else(|| Self::missing(id))?;
        row.previous_refresh_token = None;
        tx.stage(row);
        Ok(())
    }
}
