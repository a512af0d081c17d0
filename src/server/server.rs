use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::ServerConfig;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::{OAuth, Settings};
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub rotation_service: Arc<dyn TokenRotationService>,
    pub secret_hasher: Arc<dyn SecretHasher>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let config = server_config(&settings.oauth);

        let secret_hasher = secret_hasher(&settings.oauth.client_secret_strategy)?;

        let (tx_manager, token_repo, client_repo, pool): (
            Arc<dyn TxManager>,
            Arc<dyn TokenRepo>,
            Arc<dyn ClientRepo>,
            Option<Pool<MySql>>,
        ) = match settings.store.backend.as_str() {
            "memory" => {
                let db = MemoryDb::new();
                let tx_manager: Arc<dyn TxManager> = Arc::new(MemoryTxManager::new(db.clone()));
                let token_repo: Arc<dyn TokenRepo> = Arc::new(MemoryTokenRepo::new(db.clone()));
                let client_repo: Arc<dyn ClientRepo> = Arc::new(MemoryClientRepo::new(db));
                (tx_manager, token_repo, client_repo, None)
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.dsn is required for mysql"))?;
                let pool = Pool::<MySql>::connect(dsn).await?;
                let tx_manager: Arc<dyn TxManager> = Arc::new(MySqlTxManager::new(pool.clone()));
                let token_repo: Arc<dyn TokenRepo> = Arc::new(MySqlTokenRepo::new(pool.clone()));
                let client_repo: Arc<dyn ClientRepo> = Arc::new(MySqlClientRepo::new(pool.clone()));
                (tx_manager, token_repo, client_repo, Some(pool))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let context = ServerContext {
            config,
            clock: Arc::new(SystemClock),
            tx_manager,
            token_repo,
            client_directory: Arc::new(RealClientDirectory::new(
                client_repo,
                secret_hasher.clone(),
            )),
            scope_validator: Arc::new(ScopeChecker),
            lifetime_policy: Arc::new(ConfiguredLifetimePolicy),
            token_generator: Arc::new(RandomTokenGenerator),
        };

        info!(backend = %settings.store.backend, "server started");

        Ok(Self {
            rotation_service: Arc::new(RealTokenRotationService::new(context)),
            secret_hasher,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

pub fn secret_hasher(strategy: &str) -> anyhow::Result<Arc<dyn SecretHasher>> {
    let hasher: Arc<dyn SecretHasher> = match strategy {
        "plain" => Arc::new(PlainSecretHasher),
        "sha256" => Arc::new(Sha256SecretHasher),
        "argon2" => Arc::new(Argon2SecretHasher),
        other => return Err(anyhow::anyhow!("Unknown client secret strategy: {}", other)),
    };
    Ok(hasher)
}

pub fn server_config(oauth: &OAuth) -> ServerConfig {
    ServerConfig {
        refresh_token_revoked_on_use: oauth.refresh_token_revoked_on_use,
        refresh_token_revoke_in: Duration::from_secs(oauth.refresh_token_revoke_in_secs),
        use_refresh_token: oauth.use_refresh_token,
        access_token_expires_in: oauth.access_token_expires_in_secs.map(Duration::from_secs),
        custom_access_token_expires_in: oauth
            .custom_access_token_expires_in
            .iter()
            .map(|(uid, secs)| (uid.clone(), Duration::from_secs(*secs)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::parse_settings;
    use std::collections::HashMap;

    #[test]
    fn maps_oauth_settings() {
        let oauth = OAuth {
            refresh_token_revoked_on_use: false,
            refresh_token_revoke_in_secs: 10,
            use_refresh_token: true,
            access_token_expires_in_secs: None,
            client_secret_strategy: "plain".to_string(),
            custom_access_token_expires_in: HashMap::from([("cli".to_string(), 30)]),
        };
        let config = server_config(&oauth);
        assert!(!config.refresh_token_revoked_on_use);
        assert_eq!(config.refresh_token_revoke_in, Duration::from_secs(10));
        assert_eq!(config.access_token_expires_in, None);
        assert_eq!(
            config.custom_access_token_expires_in.get("cli"),
            Some(&Duration::from_secs(30))
        );
    }

    #[tokio::test]
    async fn configured_hasher_stores_verifiable_secrets() {
        let hasher = secret_hasher("sha256").unwrap();
        let stored = hasher.hash_secret("s3cret").await.unwrap();
        assert_ne!(stored, "s3cret");
        assert!(hasher.verify_secret("s3cret", &stored).await.unwrap());

        assert!(secret_hasher("rot13").is_err());
    }

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        let server = Server::try_new(&settings).await.unwrap();
        let result = server
            .rotation_service
            .rotate(None, RotationParams::new("unknown"))
            .await;
        assert!(matches!(result, Err(OAuthError::InvalidGrant(_))));
        server.shutdown().await;
    }
}
