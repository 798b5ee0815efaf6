// Session context: the active session id and its resolved roster

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::filter::{entry_identifier, MemberSet};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session id configured")]
    MissingSessionId,

    #[error("Invalid session id '{0}'")]
    InvalidSessionId(String),

    #[error("Session '{session_id}' lookup returned HTTP {status}")]
    Status { session_id: String, status: u16 },

    #[error("Malformed session payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Immutable view of one session, shared by every call made while it is current
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub name: Option<String>,
    pub active: bool,
    pub members: MemberSet,
    pub controls: Value,
    pub schedule: Value,
}

impl SessionSnapshot {
    /// Snapshot for a session whose roster has not been loaded yet
    pub fn empty(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    pub fn is_member(&self, student: &str) -> bool {
        self.members.contains(student)
    }

    /// Build a snapshot from a `GET /sessions/{id}` payload:
    /// `{ session: { name, students, controls, schedule }, active }`
    pub fn from_detail(session_id: &str, payload: &Value) -> Result<Self, SessionError> {
        let detail: SessionDetail = serde_json::from_value(payload.clone())?;
        let session = detail
            .session
            .ok_or_else(|| SessionError::Malformed("missing 'session' object".to_string()))?;

        let members = session
            .students
            .iter()
            .filter_map(entry_identifier)
            .collect();

        Ok(Self {
            session_id: session_id.to_string(),
            name: session.name.filter(|n| !n.is_empty()),
            active: detail.active,
            members,
            controls: session.controls,
            schedule: session.schedule,
        })
    }

    /// Payload served to the presence badge
    pub fn badge(&self) -> Value {
        let mut badge = serde_json::json!({
            "session_id": self.session_id,
            "active": self.active,
            "members": self.members.len(),
        });
        if let Some(name) = &self.name {
            badge["name"] = Value::String(name.clone());
        }
        badge
    }
}

#[derive(Debug, Deserialize)]
struct SessionDetail {
    session: Option<SessionBody>,
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    name: Option<String>,
    #[serde(default)]
    students: Vec<Value>,
    #[serde(default)]
    controls: Value,
    #[serde(default)]
    schedule: Value,
}

/// Owner of the current [`SessionSnapshot`].
///
/// Readers take an `Arc` clone and keep it for the whole call; `replace`
/// swaps the reference in one step so a reader sees either the old or the new
/// roster, never a mix.
#[derive(Debug)]
pub struct SessionContext {
    current: RwLock<Arc<SessionSnapshot>>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(Arc::new(SessionSnapshot::empty(session_id))),
        }
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn session_id(&self) -> String {
        self.snapshot().session_id.clone()
    }

    pub fn replace(&self, snapshot: SessionSnapshot) -> Arc<SessionSnapshot> {
        let snapshot = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&snapshot),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&snapshot),
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail() -> Value {
        json!({
            "ok": true,
            "session": {
                "id": "sess_1",
                "name": "Period 3",
                "students": ["a@x.com", {"id": "b@x.com", "name": "B"}, ""],
                "controls": {"focusMode": true, "allowlist": []},
                "schedule": {"entries": []}
            },
            "active": true
        })
    }

    #[test]
    fn parses_roster_from_session_detail() {
        let snapshot = SessionSnapshot::from_detail("sess_1", &detail()).unwrap();
        assert_eq!(snapshot.name.as_deref(), Some("Period 3"));
        assert!(snapshot.active);
        assert!(snapshot.is_member("a@x.com"));
        assert!(snapshot.is_member("b@x.com"));
        assert_eq!(snapshot.members.len(), 2);
        assert_eq!(snapshot.controls["focusMode"], json!(true));
        assert_eq!(snapshot.schedule, json!({"entries": []}));
    }

    #[test]
    fn rejects_payload_without_session() {
        let err = SessionSnapshot::from_detail("x", &json!({"ok": false, "error": "not found"})).unwrap_err();
        assert!(matches!(err, SessionError::Malformed(_)));
    }

    #[test]
    fn badge_omits_missing_name() {
        let payload = json!({"session": {"students": ["a"]}, "active": false});
        let badge = SessionSnapshot::from_detail("s", &payload).unwrap().badge();
        assert!(badge.get("name").is_none());
        assert_eq!(badge["members"], json!(1));
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let ctx = SessionContext::new("sess_1");
        let before = ctx.snapshot();
        assert!(before.members.is_empty());

        ctx.replace(SessionSnapshot::from_detail("sess_1", &detail()).unwrap());

        assert!(before.members.is_empty());
        assert_eq!(ctx.snapshot().members.len(), 2);
        assert_eq!(ctx.session_id(), "sess_1");
    }
}
