//! In-process storage with the same locking contract as the MySQL backend.
//! Used by tests and for running without a database.

mod client_repo_memory;
mod token_repo_memory;

pub use client_repo_memory::*;
pub use token_repo_memory::*;

mod repo_tx_memory;

pub use repo_tx_memory::*;

mod util;
