use serde_json::{Map, Value};
use std::collections::HashSet;

/// Session roster: the student identifiers allowed through the filter
pub type MemberSet = HashSet<String>;

/// Field names probed, in order, to find an entity's identity.
/// Order matters: an entity carrying both `id` and `email` resolves to `id`.
pub const CANDIDATE_IDENTITY_FIELDS: [&str; 4] = ["id", "email", "student", "user"];

/// Closed view over a JSON node
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Scalar(&'a Value),
    Sequence(&'a [Value]),
    Record(&'a Map<String, Value>),
}

impl<'a> Shape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Shape::Sequence(items),
            Value::Object(map) => Shape::Record(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Shape::Scalar(value),
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, Shape::Scalar(_))
    }
}
