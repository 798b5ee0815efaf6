use serde_json::{Map, Value};

use super::identity::{entry_identifier, resolve_identity};
use super::types::{MemberSet, Shape};

/// Result of a filtering pass
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub value: Value,
    /// Number of sequence elements dropped anywhere in the tree
    pub removed: usize,
}

/// Recursive roster filter over arbitrary JSON.
///
/// Only sequence elements are ever removed: an element that resolves to an
/// identity outside the roster is dropped, everything else is kept and
/// descended into. Records are rebuilt with their nested containers filtered
/// and are never removed at their own level. The input is never mutated.
pub struct PayloadFilter<'a> {
    members: &'a MemberSet,
}

impl<'a> PayloadFilter<'a> {
    pub fn new(members: &'a MemberSet) -> Self {
        Self { members }
    }

    pub fn apply(&self, value: &Value) -> Filtered {
        let mut removed = 0;
        let value = self.visit(value, &mut removed);
        Filtered { value, removed }
    }

    fn visit(&self, value: &Value, removed: &mut usize) -> Value {
        match Shape::of(value) {
            Shape::Scalar(scalar) => scalar.clone(),
            Shape::Sequence(items) => Value::Array(self.visit_sequence(items, removed)),
            Shape::Record(map) => Value::Object(self.visit_record(map, removed)),
        }
    }

    fn visit_sequence(&self, items: &[Value], removed: &mut usize) -> Vec<Value> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if let Some(identity) = resolve_identity(item) {
                if !self.members.contains(&identity) {
                    *removed += 1;
                    continue;
                }
            }
            kept.push(self.visit(item, removed));
        }
        kept
    }

    fn visit_record(&self, map: &Map<String, Value>, removed: &mut usize) -> Map<String, Value> {
        map.iter()
            .map(|(key, field)| {
                let field = if Shape::of(field).is_container() {
                    self.visit(field, removed)
                } else {
                    field.clone()
                };
                (key.clone(), field)
            })
            .collect()
    }
}

/// Filter `value` against the roster, returning the pruned copy
pub fn filter_value(value: &Value, members: &MemberSet) -> Value {
    PayloadFilter::new(members).apply(value).value
}

/// Flat containment filter for roster lists carried in request bodies.
/// Entries without an identifier are dropped along with non-members.
pub fn retain_members(entries: &[Value], members: &MemberSet) -> Vec<Value> {
    entries
        .iter()
        .filter(|entry| entry_identifier(entry).is_some_and(|id| members.contains(&id)))
        .cloned()
        .collect()
}
