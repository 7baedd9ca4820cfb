//! Scanned result rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;

/// One returned database record: a column-name → value mapping,
/// constructed fresh for each scanned result.
///
/// Being a plain map it serializes readily. Column order is irrelevant and
/// keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    /// An empty row; `has_data()` is false.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any columns were populated. Distinguishes "no matching row"
    /// (empty map) from "row present but values null".
    pub fn has_data(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Whether the row contains `column`.
    pub fn has(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Set a column value, returning the previous one if present.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.columns.insert(column.into(), value.into())
    }

    /// Remove a column.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    /// Number of populated columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over (column, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
