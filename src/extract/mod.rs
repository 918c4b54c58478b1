//! Field extraction: mapping placeholder names to values found in source text.

mod openrouter;
mod prompt;
mod response;

pub use openrouter::{OpenRouterExtractor, OpenRouterOptions, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use prompt::{extraction_prompt, KEY_CHECK_PROMPT};
pub use response::{parse_field_values, strip_code_fence};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Value used for a field the source text does not contain.
pub const NOT_FOUND: &str = "Not Found";

/// Extracted values keyed by field name, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Check if a field has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Requested fields that have no value.
    pub fn missing<'a>(&self, fields: &'a [String]) -> Vec<&'a str> {
        fields
            .iter()
            .filter(|f| !self.0.contains_key(f.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Fill every requested field that has no value with [`NOT_FOUND`].
    pub fn complete_for(mut self, fields: &[String]) -> Self {
        for field in fields {
            self.0
                .entry(field.clone())
                .or_insert_with(|| NOT_FOUND.to_string());
        }
        self
    }

    /// Number of values that are not [`NOT_FOUND`].
    pub fn found_count(&self) -> usize {
        self.0.values().filter(|v| v.as_str() != NOT_FOUND).count()
    }
}

impl FromIterator<(String, String)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for FieldValues {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Maps requested field names to values found in source text.
///
/// Implementations are called once per run with the full field list and the
/// full source text. The returned map must contain every requested field.
pub trait FieldExtractor: Send + Sync {
    /// Extract values for `fields` from `source_text`.
    fn extract(&self, fields: &[String], source_text: &str) -> Result<FieldValues>;
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for Box<T> {
    fn extract(&self, fields: &[String], source_text: &str) -> Result<FieldValues> {
        (**self).extract(fields, source_text)
    }
}

/// Extractor that answers from a fixed set of values.
///
/// Used when values come from a file instead of a remote service.
#[derive(Debug, Clone, Default)]
pub struct PresetExtractor {
    values: FieldValues,
}

impl PresetExtractor {
    /// Create an extractor over fixed values.
    pub fn new(values: FieldValues) -> Self {
        Self { values }
    }

    /// Create an extractor from a JSON object of field values.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(parse_field_values(text, &[])?))
    }
}

impl FieldExtractor for PresetExtractor {
    fn extract(&self, fields: &[String], _source_text: &str) -> Result<FieldValues> {
        let values = fields
            .iter()
            .filter_map(|f| self.values.get(f).map(|v| (f.clone(), v.to_string())))
            .collect::<FieldValues>();
        Ok(values.complete_for(fields))
    }
}
