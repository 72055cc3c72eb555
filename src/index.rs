use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use allocative::Allocative;

use crate::table::RowId;
use crate::value::Value;

/// An ordered map from a column's canonical values to the rows holding them.
///
/// Keys are visited in ascending canonical order; within one key, row ids
/// keep their insertion order. The index only stores row ids, the owning
/// [crate::Table] keeps the rows themselves.
#[derive(Debug, Clone, Default, Allocative)]
pub struct Index {
    /// The indexed column.
    column: String,
    entries: BTreeMap<Arc<str>, Vec<RowId>>,
}

impl Index {
    /// Creates an empty index over `column`.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Records that `row` holds `value`. Absent values are not indexed.
    pub fn insert(&mut self, value: &Value, row: RowId) {
        if let Some(key) = value.canonical_key() {
            self.entries.entry(key).or_default().push(row);
        }
    }

    /// Rows whose value equals `key`, in insertion order.
    pub fn lookup(&self, key: &str) -> &[RowId] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows whose value is strictly greater than `key`, bucket by bucket in
    /// ascending key order.
    pub fn greater_than(&self, key: &str) -> Vec<RowId> {
        self.collect((Bound::Excluded(key), Bound::Unbounded))
    }

    /// Rows whose value is strictly less than `key`, bucket by bucket in
    /// ascending key order.
    pub fn less_than(&self, key: &str) -> Vec<RowId> {
        self.collect((Bound::Unbounded, Bound::Excluded(key)))
    }

    /// Iterates over `(key, rows)` buckets in ascending key order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[RowId])> {
        self.entries
            .iter()
            .map(|(key, rows)| (key.as_ref(), rows.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn collect(&self, range: (Bound<&str>, Bound<&str>)) -> Vec<RowId> {
        self.entries
            .range::<str, _>(range)
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect()
    }
}
