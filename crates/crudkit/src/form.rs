//! Key/value input forms supplying field values for a CRUD call.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CrudError, CrudResult};
use crate::value::Value;

/// Abstract mapping from field name to value, supplied by the caller for
/// one CRUD call.
///
/// Create and single-read may mutate the form, e.g. to inject a
/// driver-generated identifier before a follow-up read. Keys are unique;
/// ordering is irrelevant.
pub trait Form {
    /// Whether the form holds a value for `name`.
    fn has(&self, name: &str) -> bool;

    /// Get the value for `name`, if present.
    fn get(&self, name: &str) -> Option<&Value>;

    /// Set (or replace) the value for `name`.
    fn set(&mut self, name: &str, value: Value);

    /// Remove the value for `name`.
    fn remove(&mut self, name: &str) -> Option<Value>;

    /// Visit every (name, value) pair.
    fn each(&self, visit: &mut dyn FnMut(&str, &Value));
}

/// Map-backed [`Form`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MapForm {
    entries: BTreeMap<String, Value>,
}

impl MapForm {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from any serializable record.
    ///
    /// Serde field attributes act as the per-field tag: `#[serde(rename)]`
    /// picks the form key and `#[serde(skip)]` (or `skip_serializing`)
    /// leaves the field out. The record must serialize to a flat structure
    /// with named fields; nested values are carried as their JSON text.
    ///
    /// ```
    /// use crudkit::{Form, MapForm, Value};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct NewStudent<'a> {
    ///     name: &'a str,
    ///     age: i32,
    ///     #[serde(skip)]
    ///     internal: bool,
    /// }
    ///
    /// let form = MapForm::from_record(&NewStudent {
    ///     name: "John Doe",
    ///     age: 25,
    ///     internal: true,
    /// })
    /// .unwrap();
    /// assert_eq!(form.get("age"), Some(&Value::BigInt(25)));
    /// assert!(!form.has("internal"));
    /// ```
    pub fn from_record<T: Serialize>(record: &T) -> CrudResult<Self> {
        let json = serde_json::to_value(record)
            .map_err(|e| CrudError::Serialization(e.to_string()))?;
        let serde_json::Value::Object(map) = json else {
            return Err(CrudError::Serialization(
                "record must serialize to a structure with named fields".to_string(),
            ));
        };

        let mut form = Self::new();
        for (key, value) in map {
            form.entries.insert(key, Value::from(value));
        }
        Ok(form)
    }

    /// Like [`MapForm::from_record`], merging `overrides` on top of the
    /// record's values afterwards.
    pub fn from_record_with<T: Serialize>(record: &T, overrides: &dyn Form) -> CrudResult<Self> {
        let mut form = Self::from_record(record)?;
        overrides.each(&mut |name, value| {
            form.entries.insert(name.to_string(), value.clone());
        });
        Ok(form)
    }
}

impl Form for MapForm {
    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), value);
    }

    fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    fn each(&self, visit: &mut dyn FnMut(&str, &Value)) {
        for (name, value) in &self.entries {
            visit(name, value);
        }
    }
}

impl FromIterator<(String, Value)> for MapForm {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
