//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Value interning for one axis field.
//!
//! Each distinct value seen in a field is stored once and referenced by a
//! ValueId. IDs are handed out in order of first occurrence, so iterating
//! IDs ascending replays the source order without a separate index.

use std::cmp::Ordering;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use engine::format_general_number;
use crate::definition::SortOrder;

/// A source record: a JSON object with string keys.
pub type Record = Map<String, Value>;

/// A reference to an interned value within a field's unique value store.
pub type ValueId = u32;

// ============================================================================
// FIELD VALUES
// ============================================================================

/// A normalized, hashable representation of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// The key is absent or holds JSON null.
    Missing,
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl FieldValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Bool(b)) => FieldValue::Boolean(*b),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => FieldValue::Number(OrderedFloat(f)),
                None => FieldValue::Text(n.to_string()),
            },
            // Nested values group by their compact JSON text.
            Some(other) => FieldValue::Text(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Text shown for this item in the summary.
    pub fn label(&self, missing_label: &str) -> String {
        match self {
            FieldValue::Missing => missing_label.to_string(),
            FieldValue::Number(n) => format_general_number(n.0),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(true) => "TRUE".to_string(),
            FieldValue::Boolean(false) => "FALSE".to_string(),
        }
    }

    /// Numbers < text < booleans; Missing always last.
    fn compare(a: &FieldValue, b: &FieldValue) -> Ordering {
        match (a, b) {
            (FieldValue::Missing, FieldValue::Missing) => Ordering::Equal,
            (FieldValue::Missing, _) => Ordering::Greater,
            (_, FieldValue::Missing) => Ordering::Less,

            (FieldValue::Number(na), FieldValue::Number(nb)) => {
                na.0.partial_cmp(&nb.0).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Number(_), _) => Ordering::Less,
            (_, FieldValue::Number(_)) => Ordering::Greater,

            (FieldValue::Text(ta), FieldValue::Text(tb)) => ta.cmp(tb),
            (FieldValue::Text(_), _) => Ordering::Less,
            (_, FieldValue::Text(_)) => Ordering::Greater,

            (FieldValue::Boolean(ba), FieldValue::Boolean(bb)) => ba.cmp(bb),
        }
    }
}

/// Reads `field` from a record.
pub fn record_value(record: &Record, field: &str) -> FieldValue {
    FieldValue::from_json(record.get(field))
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other, and -0.0 equals 0.0.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

// ============================================================================
// FIELD CACHE
// ============================================================================

/// Unique value store for a single field.
#[derive(Debug, Clone)]
pub struct FieldCache {
    /// Record key this cache represents.
    pub name: String,

    value_to_id: FxHashMap<FieldValue, ValueId>,

    /// Unique values indexed by ValueId, in first-seen order.
    id_to_value: Vec<FieldValue>,
}

impl FieldCache {
    pub fn new(name: String) -> Self {
        FieldCache {
            name,
            value_to_id: FxHashMap::default(),
            id_to_value: Vec::new(),
        }
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: FieldValue) -> ValueId {
        if let Some(&id) = self.value_to_id.get(&value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value, id);
        id
    }

    pub fn get_value(&self, id: ValueId) -> Option<&FieldValue> {
        self.id_to_value.get(id as usize)
    }

    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }

    /// All ValueIds arranged by the requested order.
    pub fn ordered_ids(&self, order: SortOrder) -> Vec<ValueId> {
        let mut ids: Vec<ValueId> = (0..self.id_to_value.len() as ValueId).collect();
        match order {
            SortOrder::SourceOrder => {}
            SortOrder::Ascending => ids.sort_by(|&a, &b| self.compare_ids(a, b)),
            SortOrder::Descending => ids.sort_by(|&a, &b| {
                // Missing stays last either way.
                let (va, vb) = (&self.id_to_value[a as usize], &self.id_to_value[b as usize]);
                match (va.is_missing(), vb.is_missing()) {
                    (false, false) => FieldValue::compare(vb, va),
                    _ => FieldValue::compare(va, vb),
                }
            }),
        }
        ids
    }

    fn compare_ids(&self, a: ValueId, b: ValueId) -> Ordering {
        FieldValue::compare(&self.id_to_value[a as usize], &self.id_to_value[b as usize])
    }
}
