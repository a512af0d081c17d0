use super::ServerContext;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::StorageTx;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestState {
    Constructed,
    Validated,
    Committed,
    Failed,
}

/// One refresh-token grant: validation, then a single transaction that
/// locks the presented token, retires it and issues its successor.
pub struct RefreshTokenRequest<'s> {
    server: &'s ServerContext,
    refresh_token: Option<AccessToken>,
    credentials: Option<Credentials>,
    client: Option<Client>,
    params: RotationParams,
    scopes: Option<Scopes>,
    state: RequestState,
}

impl<'s> RefreshTokenRequest<'s> {
    /// `refresh_token` is the row located by the presented value, if any.
    /// Presented credentials are resolved to a client here.
    pub async fn new(
        server: &'s ServerContext,
        refresh_token: Option<AccessToken>,
        credentials: Option<Credentials>,
        params: RotationParams,
    ) -> Result<Self, OAuthError> {
        let client = match &credentials {
            Some(c) => {
                server
                    .client_directory
                    .find_by_credentials(&c.uid, &c.secret)
                    .await?
            }
            None => None,
        };

        Ok(Self {
            server,
            refresh_token,
            credentials,
            client,
            params,
            scopes: None,
            state: RequestState::Constructed,
        })
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    /// Validate then execute.
    pub async fn authorize(mut self) -> Result<AccessToken, OAuthError> {
        self.validate()?;
        self.execute().await
    }

    /// Checks run in order and the first failure wins. Never touches the
    /// store.
    pub fn validate(&mut self) -> Result<(), OAuthError> {
        match self.check() {
            Ok(scopes) => {
                self.scopes = Some(scopes);
                self.state = RequestState::Validated;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "refresh token request rejected");
                self.state = RequestState::Failed;
                Err(e)
            }
        }
    }

    fn check(&self) -> Result<Scopes, OAuthError> {
        let parameter_present = self
            .params
            .refresh_token
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());
        if self.refresh_token.is_none() && !parameter_present {
            return Err(OAuthError::InvalidRequest(
                "Missing required parameter: refresh_token.".to_string(),
            ));
        }

        let token = match &self.refresh_token {
            Some(t) if !t.is_revoked(self.server.clock.as_ref()) => t,
            Some(_) => {
                return Err(OAuthError::InvalidGrant(
                    "The refresh token has been revoked.".to_string(),
                ));
            }
            None => {
                return Err(OAuthError::InvalidGrant(
                    "The refresh token is invalid.".to_string(),
                ));
            }
        };

        if self.credentials.is_some() && self.client.is_none() {
            return Err(OAuthError::InvalidClient(
                "Client authentication failed due to unknown client or invalid secret."
                    .to_string(),
            ));
        }

        if let Some(client) = &self.client {
            if token.application_id != Some(client.id) {
                return Err(OAuthError::InvalidGrant(
                    "The refresh token was issued to another client.".to_string(),
                ));
            }
        }

        match self.params.requested_scope() {
            Some(requested) => {
                if self.server.scope_validator.is_subset(requested, &token.scopes) {
                    Ok(Scopes::from_string(requested))
                } else {
                    Err(OAuthError::InvalidScope(
                        "The requested scope exceeds the scope granted to the refresh token."
                            .to_string(),
                    ))
                }
            }
            None => Ok(token.scopes.clone()),
        }
    }

    /// Run the rotation transaction. Must follow a successful `validate`.
    pub async fn execute(mut self) -> Result<AccessToken, OAuthError> {
        if self.state != RequestState::Validated {
            return Err(OAuthError::InternalError(format!(
                "refresh token request executed in state {:?}",
                self.state
            )));
        }

        let server = self.server;
        let mut tx = server
            .tx_manager
            .begin()
            .await
            .map_err(|e| OAuthError::Store(e.to_string()))?;

        let outcome = self.rotate_in_tx(tx.as_mut()).await;
        match outcome {
            Ok(successor) => {
                tx.commit()
                    .await
                    .map_err(|e| OAuthError::Store(e.to_string()))?;
                self.state = RequestState::Committed;
                info!(
                    token_id = %successor.id,
                    application_id = ?successor.application_id,
                    "refresh token rotated"
                );
                Ok(successor)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    error!(error = %rollback, "rotation rollback failed");
                }
                self.state = RequestState::Failed;
                if let OAuthError::ReuseDetected(id) = &e {
                    warn!(
                        token_id = %id,
                        client = ?self.client.as_ref().map(|c| &c.uid),
                        "revoked refresh token presented again, possible replay"
                    );
                }
                Err(e)
            }
        }
    }

    async fn rotate_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
    ) -> Result<AccessToken, OAuthError> {
        let server = self.server;
        let repo = server.token_repo.as_ref();
        let clock = server.clock.as_ref();
        let config = &server.config;

        let presented = self.refresh_token.as_ref().ok_or_else(|| {
            OAuthError::InternalError("validated request lost its refresh token".to_string())
        })?;

        let mut locked = repo
            .lock_for_update_in_tx(tx, presented.id)
            .await?
            .ok_or_else(|| OAuthError::InvalidGrant("The refresh token is invalid.".to_string()))?;

        // Another rotation may have committed between validation and the lock.
        if locked.is_revoked(clock) {
            return Err(OAuthError::ReuseDetected(locked.id));
        }

        if config.refresh_token_revoked_on_use {
            locked.revoke(tx, repo, clock).await?;
        } else if locked.revoked_at().is_none() {
            // A retry inside the grace window keeps the first deadline.
            locked
                .revoke_in(tx, repo, clock, config.refresh_token_revoke_in)
                .await?;
        }

        let previous_successors = match locked.refresh_token_value() {
            Some(value) => repo.find_by_previous_refresh_token_in_tx(tx, value).await?,
            None => Vec::new(),
        };

        let successor = self.build_successor(&locked, &previous_successors);
        repo.create_in_tx(tx, &successor).await?;
        Ok(successor)
    }

    /// New token for the same client and owner. Reuses the refresh value of
    /// a successor already issued for `predecessor`, so duplicate rotations
    /// converge on one refresh token.
    fn build_successor(
        &self,
        predecessor: &AccessToken,
        previous_successors: &[AccessToken],
    ) -> AccessToken {
        let server = self.server;
        let config = &server.config;

        let existing_refresh = previous_successors
            .iter()
            .rev()
            .find_map(|t| t.refresh_token_value())
            .map(str::to_owned);
        if existing_refresh.is_some() {
            debug!(
                predecessor = %predecessor.id,
                "reusing refresh token of an earlier successor"
            );
        }
        let refresh_token = existing_refresh.or_else(|| {
            config
                .use_refresh_token
                .then(|| server.token_generator.generate())
        });

        AccessToken {
            id: TokenId::new_v4(),
            token: server.token_generator.generate(),
            refresh_token,
            application_id: predecessor.application_id,
            resource_owner_id: predecessor.resource_owner_id.clone(),
            scopes: self.scopes.clone().unwrap_or_else(|| predecessor.scopes.clone()),
            expires_in: server
                .lifetime_policy
                .access_token_expires_in(config, self.client.as_ref()),
            created_at: server.clock.now(),
            revoked_at: None,
            // Recorded under both policies so duplicate rotations find this one.
            previous_refresh_token: predecessor.refresh_token_value().map(str::to_owned),
            uses_refresh_token: config.use_refresh_token,
        }
    }
}
