mod clock;
mod client_repo;
mod token_policy;
mod token_repo;

pub use clock::*;
pub use client_repo::*;
pub use token_policy::*;
pub use token_repo::*;

mod repo_tx;

pub use repo_tx::*;
