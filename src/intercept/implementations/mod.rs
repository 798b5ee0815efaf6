// Built-in interceptor stages

pub mod session_header;
pub mod roster_body;
pub mod watched_response;

pub use session_header::SessionHeaderInterceptor;
pub use roster_body::{RosterBodyInterceptor, ROSTER_FIELD};
pub use watched_response::WatchedResponseInterceptor;
