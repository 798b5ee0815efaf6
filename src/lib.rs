pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod intercept;
pub mod middleware;
pub mod session;
pub mod transport;

pub use client::ScopedClient;
pub use error::{ApiError, ScopeError};
