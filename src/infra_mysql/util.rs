use super::repo_tx_mysql::{MYSQL_BACKEND, MySqlTx};
use crate::application_port::OAuthError;
use crate::domain_port::*;

pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> Result<&'a mut MySqlTx<'t>, OAuthError> {
    if tx.backend() != MYSQL_BACKEND {
        return Err(OAuthError::Store(format!(
            "mysql repo used with a {} transaction",
            tx.backend()
        )));
    }
    // SAFETY: `MySqlTx` is the only type reporting the mysql backend.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MySqlTx<'t>;
        Ok(&mut *p)
    }
}

#[inline]
pub fn store_err(context: &str, e: impl std::fmt::Display) -> OAuthError {
    OAuthError::Store(format!("{context}: {e}"))
}
