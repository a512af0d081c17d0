mod client;
mod revocable;
mod scope;
mod server;
mod token;

pub use client::*;
pub use revocable::*;
pub use scope::*;
pub use server::*;
pub use token::*;
