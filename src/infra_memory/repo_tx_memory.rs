use crate::domain_model::*;
use crate::domain_port::{StorageTx, TxManager};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

pub const MEMORY_BACKEND: &str = "memory";

/// Committed rows and the row lock table shared by all memory transactions.
#[derive(Default)]
pub struct MemoryDb {
    tokens: Mutex<HashMap<TokenId, AccessToken>>,
    clients: DashMap<String, Client>,
    row_locks: DashMap<TokenId, Arc<tokio::sync::Mutex<()>>>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store a token issued outside rotation, e.g. by a grant flow.
    pub fn insert_token(&self, token: AccessToken) {
        self.committed().insert(token.id, token);
    }

    pub fn insert_client(&self, client: Client) {
        self.clients.insert(client.uid.clone(), client);
    }

    pub fn tokens(&self) -> Vec<AccessToken> {
        let mut tokens: Vec<_> = self.committed().values().cloned().collect();
        tokens.sort_by_key(|t| t.created_at);
        tokens
    }

    pub(super) fn committed(&self) -> MutexGuard<'_, HashMap<TokenId, AccessToken>> {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(super) fn client(&self, uid: &str) -> Option<Client> {
        self.clients.get(uid).map(|c| c.value().clone())
    }

    fn row_lock(&self, id: TokenId) -> Arc<tokio::sync::Mutex<()>> {
        self.row_locks
            .entry(id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .value()
            .clone()
    }
}

pub struct MemoryTxManager {
    db: Arc<MemoryDb>,
}

impl MemoryTxManager {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryTxManager { db }
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        Ok(Box::new(MemoryTx::new(&self.db)))
    }
}

/// Writes are staged and become visible to others on commit. Row locks are
/// released when the transaction is dropped.
pub struct MemoryTx<'t> {
    db: &'t MemoryDb,
    staged: HashMap<TokenId, AccessToken>,
    held: HashMap<TokenId, OwnedMutexGuard<()>>,
}

impl<'t> MemoryTx<'t> {
    pub fn new(db: &'t MemoryDb) -> Self {
        MemoryTx {
            db,
            staged: HashMap::new(),
            held: HashMap::new(),
        }
    }

    pub fn get(&self, id: TokenId) -> Option<AccessToken> {
        self.staged
            .get(&id)
            .cloned()
            .or_else(|| self.db.committed().get(&id).cloned())
    }

    /// Rows matching `pred` as this transaction sees them, oldest first.
    pub fn scan(&self, pred: impl Fn(&AccessToken) -> bool) -> Vec<AccessToken> {
        let mut rows: Vec<AccessToken> = {
            let committed = self.db.committed();
            committed
                .values()
                .filter(|t| !self.staged.contains_key(&t.id))
                .chain(self.staged.values())
                .filter(|t| pred(*t))
                .cloned()
                .collect()
        };
        rows.sort_by_key(|t| t.created_at);
        rows
    }

    pub fn stage(&mut self, token: AccessToken) {
        self.staged.insert(token.id, token);
    }

    pub async fn lock_row(&mut self, id: TokenId) {
        if self.held.contains_key(&id) {
            return;
        }
        let guard = self.db.row_lock(id).lock_owned().await;
        self.held.insert(id, guard);
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx<'t> {
    fn backend(&self) -> &'static str {
        MEMORY_BACKEND
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryTx { db, staged, held } = *self;
        db.committed().extend(staged);
        drop(held);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}
