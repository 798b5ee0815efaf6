use reqwest::Method;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::session::SessionSnapshot;

/// Per-call state handed to every stage.
/// The session snapshot is captured once when the call starts.
#[derive(Debug, Clone)]
pub struct InterceptContext {
    pub call_id: Uuid,
    pub method: Method,
    pub path: String,
    pub session: Arc<SessionSnapshot>,
    pub header_name: String,
    pub start_time: Instant,
}

impl InterceptContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        session: Arc<SessionSnapshot>,
        header_name: impl Into<String>,
    ) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            method,
            path: path.into(),
            session,
            header_name: header_name.into(),
            start_time: Instant::now(),
        }
    }

    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
