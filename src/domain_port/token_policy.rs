use crate::domain_model::*;
use std::time::Duration;

pub trait ScopeValidator: Send + Sync {
    /// Whether the space-delimited `requested` scopes are all in `granted`.
    fn is_subset(&self, requested: &str, granted: &Scopes) -> bool;
}

pub trait TokenLifetimePolicy: Send + Sync {
    /// `None` issues a non-expiring token.
    fn access_token_expires_in(
        &self,
        server: &ServerConfig,
        client: Option<&Client>,
    ) -> Option<Duration>;
}

pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}
