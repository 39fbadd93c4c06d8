//! Flat fixture records consumed by the circuit's witness generator.
//!
//! Every numeric value is a base-10 string; Merkle direction bits are the
//! only bare numbers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zkid_common::{parse_scalar, to_decimal_strings, FixtureError, MerklePath, Result, Scalar};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureRecord(Map<String, Value>);

impl FixtureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn with_scalar(mut self, key: &str, value: &Scalar) -> Self {
        self.0
            .insert(key.to_owned(), Value::String(value.to_str_radix(10)));
        self
    }

    pub fn with_count(mut self, key: &str, value: usize) -> Self {
        self.0.insert(key.to_owned(), Value::String(value.to_string()));
        self
    }

    pub fn with_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_owned(), Value::String(value.into()));
        self
    }

    pub fn with_limbs(mut self, key: &str, limbs: &[Scalar]) -> Self {
        self.0.insert(key.to_owned(), decimal_array(limbs));
        self
    }

    /// `[[x limbs], [y limbs]]`.
    pub fn with_point_limbs(mut self, key: &str, limbs: &[Vec<Scalar>; 2]) -> Self {
        let value = Value::Array(limbs.iter().map(|coord| decimal_array(coord)).collect());
        self.0.insert(key.to_owned(), value);
        self
    }

    pub fn with_path(mut self, elements_key: &str, indices_key: &str, path: &MerklePath) -> Self {
        let encoded = path.encode();
        self.0.insert(
            elements_key.to_owned(),
            Value::Array(encoded.path_elements.into_iter().map(Value::String).collect()),
        );
        self.0.insert(
            indices_key.to_owned(),
            Value::Array(encoded.path_indices.into_iter().map(Value::from).collect()),
        );
        self
    }

    /// Append `fields` verbatim, in their order. Existing keys are overwritten.
    pub fn with_passthrough(mut self, fields: &Map<String, Value>) -> Self {
        for (key, value) in fields {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Parse a decimal-string field back into a scalar.
    pub fn scalar(&self, key: &str) -> Result<Scalar> {
        match self.0.get(key) {
            Some(Value::String(text)) => parse_scalar(text),
            Some(other) => Err(FixtureError::invalid_input(format!(
                "field {key} is not a decimal string: {other}"
            ))),
            None => Err(FixtureError::invalid_input(format!("field {key} is missing"))),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

fn decimal_array(values: &[Scalar]) -> Value {
    Value::Array(
        to_decimal_strings(values)
            .into_iter()
            .map(Value::String)
            .collect(),
    )
}

/// Copy of `record` without `field`. The input is left untouched.
pub fn remove_field(record: &Map<String, Value>, field: &str) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, _)| key.as_str() != field)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// [`remove_field`] applied for every name in `fields`.
pub fn remove_fields<S: AsRef<str>>(record: &Map<String, Value>, fields: &[S]) -> Map<String, Value> {
    fields
        .iter()
        .fold(record.clone(), |acc, field| remove_field(&acc, field.as_ref()))
}
