use serde_json::{Number, Value};

use super::types::CANDIDATE_IDENTITY_FIELDS;

/// Resolve the canonical identifier of a student-like entity.
///
/// Probes [`CANDIDATE_IDENTITY_FIELDS`] in order and returns the first truthy
/// value: a non-empty string, or a non-zero number in decimal form. Anything
/// that is not a record, or a record without a usable candidate field, is not
/// identity-bearing and yields `None`.
pub fn resolve_identity(entity: &Value) -> Option<String> {
    let record = entity.as_object()?;

    CANDIDATE_IDENTITY_FIELDS
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(truthy_identifier)
}

/// Identifier carried by a bare roster entry: a string is the identifier
/// itself, a record goes through [`resolve_identity`].
pub fn entry_identifier(entry: &Value) -> Option<String> {
    match entry {
        Value::Object(_) => resolve_identity(entry),
        other => truthy_identifier(other),
    }
}

fn truthy_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => number_identifier(n),
        _ => None,
    }
}

/// Decimal form of a non-zero number. Integral floats render without a
/// fraction (`1.0` is `"1"`) so they match integer roster entries.
fn number_identifier(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }

    let f = n.as_f64()?;
    if f == 0.0 || !f.is_finite() {
        None
    } else if f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
        Some((f as i64).to_string())
    } else {
        Some(f.to_string())
    }
}

/// Largest float magnitude that still holds every integer exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_takes_precedence_over_email() {
        let entity = json!({"email": "b@x.com", "id": "a@x.com"});
        assert_eq!(resolve_identity(&entity).as_deref(), Some("a@x.com"));
    }

    #[test]
    fn falls_through_empty_and_null_candidates() {
        let entity = json!({"id": "", "email": null, "student": "s-1", "user": "u-1"});
        assert_eq!(resolve_identity(&entity).as_deref(), Some("s-1"));

        let entity = json!({"id": 0, "user": "u-9"});
        assert_eq!(resolve_identity(&entity).as_deref(), Some("u-9"));
    }

    #[test]
    fn integral_floats_match_integer_identifiers() {
        assert_eq!(resolve_identity(&json!({"id": 1.0})).as_deref(), Some("1"));
        assert_eq!(resolve_identity(&json!({"id": -7.0})).as_deref(), Some("-7"));
        assert_eq!(resolve_identity(&json!({"id": 1.5})).as_deref(), Some("1.5"));
        assert_eq!(resolve_identity(&json!({"id": 0.0, "user": 3})).as_deref(), Some("3"));
    }

    #[test]
    fn numeric_identifiers_are_rendered() {
        assert_eq!(resolve_identity(&json!({"id": 42})).as_deref(), Some("42"));
    }

    #[test]
    fn non_identity_bearing_values_resolve_to_none() {
        assert_eq!(resolve_identity(&json!("a@x.com")), None);
        assert_eq!(resolve_identity(&json!([{"id": "a"}])), None);
        assert_eq!(resolve_identity(&json!({"name": "no-id"})), None);
        assert_eq!(resolve_identity(&json!({"id": {"nested": "a"}, "email": false})), None);
    }

    #[test]
    fn roster_entries_accept_strings_and_records() {
        assert_eq!(entry_identifier(&json!("a@x.com")).as_deref(), Some("a@x.com"));
        assert_eq!(entry_identifier(&json!({"email": "b@x.com"})).as_deref(), Some("b@x.com"));
        assert_eq!(entry_identifier(&json!(null)), None);
        assert_eq!(entry_identifier(&json!("")), None);
    }
}
