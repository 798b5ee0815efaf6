pub mod filter;
pub mod get;
pub mod session;
