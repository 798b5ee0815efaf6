pub mod types;
pub mod identity;
pub mod filter;

pub use types::*;
pub use identity::{entry_identifier, resolve_identity};
pub use filter::{filter_value, retain_members, Filtered, PayloadFilter};
