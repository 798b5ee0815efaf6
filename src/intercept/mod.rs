// Interception engine: named stages composed around a transport call

pub mod context;
pub mod traits;
pub mod pipeline;
pub mod error;
pub mod watch;
pub mod implementations;

// Re-export core types
pub use context::*;
pub use traits::*;
pub use pipeline::*;
pub use error::*;
pub use watch::*;
pub use implementations::*;
