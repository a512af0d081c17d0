use super::repo_tx_memory::MemoryDb;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct MemoryClientRepo {
    db: Arc<MemoryDb>,
}

impl MemoryClientRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryClientRepo { db }
    }
}

#[async_trait::async_trait]
impl ClientRepo for MemoryClientRepo {
    async fn get_by_uid(&self, uid: &str) -> Result<Option<Client>, OAuthError> {
        Ok(self.db.client(uid))
    }
}
