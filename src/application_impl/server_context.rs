use crate::domain_model::ServerConfig;
use crate::domain_port::*;
use std::sync::Arc;

/// Deployment policy plus the collaborators a token request works with.
#[derive(Clone)]
pub struct ServerContext {
    pub config: ServerConfig,
    pub clock: Arc<dyn Clock>,
    pub tx_manager: Arc<dyn TxManager>,
    pub token_repo: Arc<dyn TokenRepo>,
    pub client_directory: Arc<dyn ClientDirectory>,
    pub scope_validator: Arc<dyn ScopeValidator>,
    pub lifetime_policy: Arc<dyn TokenLifetimePolicy>,
    pub token_generator: Arc<dyn TokenGenerator>,
}
