#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokenrot::application_impl::*;
use tokenrot::domain_model::*;
use tokenrot::infra_memory::*;

pub struct Harness {
    pub db: Arc<MemoryDb>,
    pub clock: Arc<ManualClock>,
    pub context: ServerContext,
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn harness(config: ServerConfig) -> Harness {
    let db = MemoryDb::new();
    let clock = Arc::new(ManualClock::new(start()));
    let client_repo = Arc::new(MemoryClientRepo::new(db.clone()));

    let context = ServerContext {
        config,
        clock: clock.clone(),
        tx_manager: Arc::new(MemoryTxManager::new(db.clone())),
        token_repo: Arc::new(MemoryTokenRepo::new(db.clone())),
        client_directory: Arc::new(RealClientDirectory::new(
            client_repo,
            Arc::new(PlainSecretHasher),
        )),
        scope_validator: Arc::new(ScopeChecker),
        lifetime_policy: Arc::new(ConfiguredLifetimePolicy),
        token_generator: Arc::new(RandomTokenGenerator),
    };

    Harness { db, clock, context }
}

pub fn revoke_on_use() -> ServerConfig {
    ServerConfig {
        refresh_token_revoked_on_use: true,
        ..ServerConfig::default()
    }
}

pub fn grace_period(secs: u64) -> ServerConfig {
    ServerConfig {
        refresh_token_revoked_on_use: false,
        refresh_token_revoke_in: Duration::from_secs(secs),
        ..ServerConfig::default()
    }
}

impl Harness {
    pub fn service(&self) -> RealTokenRotationService {
        RealTokenRotationService::new(self.context.clone())
    }

    pub fn register_client(&self, uid: &str, secret: &str) -> Client {
        let client = Client {
            id: ClientId(uuid::Uuid::new_v4()),
            uid: uid.to_string(),
            secret: secret.to_string(),
            name: format!("{uid} app"),
            confidential: true,
        };
        self.db.insert_client(client.clone());
        client
    }

    /// Token issued an hour ago by a grant flow.
    pub fn issue(&self, client: Option<&Client>, scopes: &str, refresh_token: &str) -> AccessToken {
        let token = AccessToken {
            id: TokenId::new_v4(),
            token: format!("access-{refresh_token}"),
            refresh_token: Some(refresh_token.to_string()),
            application_id: client.map(|c| c.id),
            resource_owner_id: Some("owner-1".to_string()),
            scopes: Scopes::from_string(scopes),
            expires_in: Some(Duration::from_secs(7200)),
            created_at: start() - chrono::Duration::hours(1),
            revoked_at: None,
            previous_refresh_token: None,
            uses_refresh_token: true,
        };
        self.db.insert_token(token.clone());
        token
    }

    pub fn stored(&self, id: TokenId) -> AccessToken {
        self.db
            .tokens()
            .into_iter()
            .find(|t| t.id == id)
            .expect("token stored")
    }

    pub fn successors_of(&self, refresh_token: &str) -> Vec<AccessToken> {
        self.db
            .tokens()
            .into_iter()
            .filter(|t| t.previous_refresh_token.as_deref() == Some(refresh_token))
            .collect()
    }
}
