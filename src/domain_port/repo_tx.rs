#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

/// An open storage transaction. Row locks taken through it are held until
/// `commit` or `rollback`.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    /// Name of the backend that created this transaction.
    fn backend(&self) -> &'static str;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
