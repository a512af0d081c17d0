//! Expected table layout:
//!
//! ```sql
//! CREATE TABLE oauth_access_token (
//!     id                     BINARY(16)   NOT NULL PRIMARY KEY,
//!     token                  VARCHAR(255) NOT NULL UNIQUE,
//!     refresh_token          VARCHAR(255) NULL,
//!     application_id         BINARY(16)   NULL,
//!     resource_owner_id      VARCHAR(255) NULL,
//!     scopes                 VARCHAR(2048) NOT NULL DEFAULT '',
//!     expires_in             INT UNSIGNED NULL,
//!     created_at             DATETIME(6)  NOT NULL,
//!     revoked_at             DATETIME(6)  NULL,
//!     previous_refresh_token VARCHAR(255) NOT NULL DEFAULT '',
//!     uses_refresh_token     BOOLEAN      NOT NULL DEFAULT TRUE,
//!     KEY idx_refresh_token (refresh_token),
//!     KEY idx_previous_refresh_token (previous_refresh_token)
//! );
//! ```
//!
//! `refresh_token` is not unique: a successor adopting the refresh value of
//! an earlier successor shares it.

use super::util::{downcast, store_err};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use std::time::Duration;

pub struct MySqlTokenRepo {
    pool: MySqlPool,
}

impl MySqlTokenRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTokenRepo { pool }
    }

    fn row_to_token(row: MySqlRow) -> Result<AccessToken, OAuthError> {
        let id: TokenId = row.try_get("id").map_err(|e| store_err("id", e))?;
        let token: String = row.try_get("token").map_err(|e| store_err("token", e))?;
        let refresh_token: Option<String> = row
            .try_get("refresh_token")
            .map_err(|e| store_err("refresh_token", e))?;
        let application_id: Option<ClientId> = row
            .try_get("application_id")
            .map_err(|e| store_err("application_id", e))?;
        let resource_owner_id: Option<String> = row
            .try_get("resource_owner_id")
            .map_err(|e| store_err("resource_owner_id", e))?;
        let scopes: String = row.try_get("scopes").map_err(|e| store_err("scopes", e))?;
        let expires_in: Option<u32> = row
            .try_get("expires_in")
            .map_err(|e| store_err("expires_in", e))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| store_err("created_at", e))?;
        let revoked_at: Option<DateTime<Utc>> = row
            .try_get("revoked_at")
            .map_err(|e| store_err("revoked_at", e))?;
        let previous_refresh_token: String = row
            .try_get("previous_refresh_token")
            .map_err(|e| store_err("previous_refresh_token", e))?;
        let uses_refresh_token: bool = row
            .try_get("uses_refresh_token")
            .map_err(|e| store_err("uses_refresh_token", e))?;

        Ok(AccessToken {
            id,
            token,
            refresh_token,
            application_id,
            resource_owner_id,
            scopes: Scopes::from_string(&scopes),
            expires_in: expires_in.map(|s| Duration::from_secs(u64::from(s))),
            created_at,
            revoked_at,
            previous_refresh_token: Some(previous_refresh_token).filter(|v| !v.is_empty()),
            uses_refresh_token,
        })
    }

    /// `expires_in` is an `INT UNSIGNED` column.
    fn expires_in_secs(token: &AccessToken) -> Result<Option<u32>, OAuthError> {
        token
            .expires_in
            .map(|d| {
                u32::try_from(d.as_secs()).map_err(|_| {
                    OAuthError::Store(format!(
                        "expires_in of {}s does not fit the expires_in column",
                        d.as_secs()
                    ))
                })
            })
            .transpose()
    }
}

#[async_trait::async_trait]
impl TokenRepo for MySqlTokenRepo {
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, token, refresh_token, application_id, resource_owner_id, scopes,
       expires_in, created_at, revoked_at, previous_refresh_token, uses_refresh_token
FROM oauth_access_token
WHERE refresh_token = ?
ORDER BY created_at DESC
LIMIT 1
"#,
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find by refresh token", e))?;

        row_opt.map(Self::row_to_token).transpose()
    }

    async fn find_by_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        refresh_token: &str,
    ) -> Result<Option<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;

        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, token, refresh_token, application_id, resource_owner_id, scopes,
       expires_in, created_at, revoked_at, previous_refresh_token, uses_refresh_token
FROM oauth_access_token
WHERE refresh_token = ?
ORDER BY created_at DESC
LIMIT 1
"#,
        )
        .bind(refresh_token)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| store_err("find by refresh token", e))?;

        row_opt.map(Self::row_to_token).transpose()
    }

    async fn find_by_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        previous_refresh_token: &str,
    ) -> Result<Vec<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;

        let rows: Vec<MySqlRow> = sqlx::query(
            r#"
SELECT id, token, refresh_token, application_id, resource_owner_id, scopes,
       expires_in, created_at, revoked_at, previous_refresh_token, uses_refresh_token
FROM oauth_access_token
WHERE previous_refresh_token = ?
ORDER BY created_at ASC
"#,
        )
        .bind(previous_refresh_token)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| store_err("find by previous refresh token", e))?;

        rows.into_iter().map(Self::row_to_token).collect()
    }

    async fn lock_for_update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<Option<AccessToken>, OAuthError> {
        let tx = downcast(tx)?;

        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, token, refresh_token, application_id, resource_owner_id, scopes,
       expires_in, created_at, revoked_at, previous_refresh_token, uses_refresh_token
FROM oauth_access_token
WHERE id = ?
FOR UPDATE
"#,
        )
        .bind(id)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| store_err("lock token", e))?;

        row_opt.map(Self::row_to_token).transpose()
    }

    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        token: &AccessToken,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;
        let expires_in = Self::expires_in_secs(token)?;

        sqlx::query(
            r#"
INSERT INTO oauth_access_token
    (id, token, refresh_token, application_id, resource_owner_id, scopes,
     expires_in, created_at, revoked_at, previous_refresh_token, uses_refresh_token)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(token.id)
        .bind(&token.token)
        .bind(token.refresh_token.as_deref())
        .bind(token.application_id)
        .bind(token.resource_owner_id.as_deref())
        .bind(token.scopes.to_string())
        .bind(expires_in)
        .bind(token.created_at)
        .bind(token.revoked_at)
        .bind(token.previous_refresh_token.as_deref().unwrap_or(""))
        .bind(token.uses_refresh_token)
        .execute(tx.conn())
        .await
        .map_err(|e| store_err("insert token", e))?;

        Ok(())
    }

    async fn update_revoked_at_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;

        sqlx::query(
            r#"
UPDATE oauth_access_token SET revoked_at = ?
WHERE id = ?
"#,
        )
        .bind(revoked_at)
        .bind(id)
        .execute(tx.conn())
        .await
        .map_err(|e| store_err("update revoked_at", e))?;

        Ok(())
    }

    async fn clear_previous_refresh_token_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        id: TokenId,
    ) -> Result<(), OAuthError> {
        let tx = downcast(tx)?;

        sqlx::query(
            r#"
UPDATE oauth_access_token SET previous_refresh_token = ''
WHERE id = ?
"#,
        )
        .bind(id)
        .execute(tx.conn())
        .await
        .map_err(|e| store_err("clear previous_refresh_token", e))?;

        Ok(())
    }
}
