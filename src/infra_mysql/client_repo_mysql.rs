use super::util::store_err;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlClientRepo {
    pool: MySqlPool,
}

impl MySqlClientRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlClientRepo { pool }
    }

    fn row_to_client(row: MySqlRow) -> Result<Client, OAuthError> {
        Ok(Client {
            id: row.try_get("id").map_err(|e| store_err("id", e))?,
            uid: row.try_get("uid").map_err(|e| store_err("uid", e))?,
            secret: row.try_get("secret").map_err(|e| store_err("secret", e))?,
            name: row.try_get("name").map_err(|e| store_err("name", e))?,
            confidential: row
                .try_get("confidential")
                .map_err(|e| store_err("confidential", e))?,
        })
    }
}

#[async_trait::async_trait]
impl ClientRepo for MySqlClientRepo {
    async fn get_by_uid(&self, uid: &str) -> Result<Option<Client>, OAuthError> {
        let row_opt: Option<MySqlRow> = sqlx::query(
            r#"
SELECT id, uid, secret, name, confidential
FROM oauth_application
WHERE uid = ?
"#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("find client", e))?;

        row_opt.map(Self::row_to_client).transpose()
    }
}
