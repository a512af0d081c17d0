mod client_directory_impl;
mod clock_fake;
mod clock_impl;
mod lifetime_policy_impl;
mod refresh_token_request;
mod scope_checker;
mod secret_hasher_impl;
mod server_context;
mod token_generator_impl;
mod token_rotation_service_impl;

pub use client_directory_impl::*;
pub use clock_fake::*;
pub use clock_impl::*;
pub use lifetime_policy_impl::*;
pub use refresh_token_request::*;
pub use scope_checker::*;
pub use secret_hasher_impl::*;
pub use server_context::*;
pub use token_generator_impl::*;
pub use token_rotation_service_impl::*;
