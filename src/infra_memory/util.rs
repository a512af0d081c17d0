use super::repo_tx_memory::{MEMORY_BACKEND, MemoryTx};
use crate::application_port::OAuthError;
use crate::domain_port::*;

pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> Result<&'a mut MemoryTx<'t>, OAuthError> {
    if tx.backend() != MEMORY_BACKEND {
        return Err(OAuthError::Store(format!(
            "memory repo used with a {} transaction",
            tx.backend()
        )));
    }
    // SAFETY: `MemoryTx` is the only type reporting the memory backend.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemoryTx<'t>;
        Ok(&mut *p)
    }
}
