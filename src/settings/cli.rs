use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tokenrot", about = "Refresh token rotation")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange a refresh token for a new token pair.
    Rotate {
        #[arg(long)]
        refresh_token: String,
        #[arg(long, requires = "client_secret")]
        client_uid: Option<String>,
        #[arg(long, requires = "client_uid")]
        client_secret: Option<String>,
        /// Space-delimited subset of the granted scopes.
        #[arg(long)]
        scope: Option<String>,
    },
    /// Print a client secret in the configured storage format.
    HashSecret {
        #[arg(long)]
        secret: String,
    },
}
