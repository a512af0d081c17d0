use crate::domain_model::{Client, ServerConfig};
use crate::domain_port::TokenLifetimePolicy;
use std::time::Duration;

/// Per-client override from the server config, else the server default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfiguredLifetimePolicy;

impl TokenLifetimePolicy for ConfiguredLifetimePolicy {
    fn access_token_expires_in(
        &self,
        server: &ServerConfig,
        client: Option<&Client>,
    ) -> Option<Duration> {
        client
            .and_then(|c| server.custom_access_token_expires_in.get(&c.uid))
            .copied()
            .or(server.access_token_expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::ClientId;

    fn client(uid: &str) -> Client {
        Client {
            id: ClientId(uuid::Uuid::new_v4()),
            uid: uid.to_string(),
            secret: String::new(),
            name: uid.to_string(),
            confidential: true,
        }
    }

    #[test]
    fn client_override_wins() {
        let mut server = ServerConfig::default();
        server
            .custom_access_token_expires_in
            .insert("mobile".to_string(), Duration::from_secs(60));

        let policy = ConfiguredLifetimePolicy;
        assert_eq!(
            policy.access_token_expires_in(&server, Some(&client("mobile"))),
            Some(Duration::from_secs(60))
        );
        assert_eq!(
            policy.access_token_expires_in(&server, Some(&client("web"))),
            server.access_token_expires_in
        );
        assert_eq!(
            policy.access_token_expires_in(&server, None),
            server.access_token_expires_in
        );
    }

    #[test]
    fn no_default_means_no_expiry() {
        let server = ServerConfig {
            access_token_expires_in: None,
            ..ServerConfig::default()
        };
        assert_eq!(ConfiguredLifetimePolicy.access_token_expires_in(&server, None), None);
    }
}
