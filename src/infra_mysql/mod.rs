mod client_repo_mysql;
mod token_repo_mysql;

pub use client_repo_mysql::*;
pub use token_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
