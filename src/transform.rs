//! Generic payload normalization.
//!
//! Every payload the cluster API returns passes through one engine before
//! it becomes a typed model. The engine guarantees that downstream code
//! never sees missing references: absent input, null fields, and malformed
//! payloads all normalize to fully defaulted values instead of surfacing
//! errors. The per-type schema is the model's serde derive; this module
//! only decides how raw JSON is prepared and dispatched.
//!
//! Rules:
//! - absent or null input builds the fully defaulted instance,
//! - null object members and null array elements are scrubbed so
//!   `#[serde(default)]` supplies zero values,
//! - sequence input is transformed element-wise in order, with falsy
//!   elements (null, false, 0, empty string) filtered out first,
//! - nested entities normalize through their own `Deserialize`/`Default`,
//! - a payload that does not match the model logs a warning and degrades
//!   to the default instance. Normalization never returns an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of a shape-dispatching [`transform`].
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed<T> {
    /// Input was a single value (object, scalar, or absent).
    One(T),
    /// Input was a sequence.
    Many(Vec<T>),
}

impl<T> Transformed<T> {
    /// The single built instance, if input was not a sequence.
    pub fn one(self) -> Option<T> {
        match self {
            Transformed::One(item) => Some(item),
            Transformed::Many(_) => None,
        }
    }

    /// The built sequence, if input was one.
    pub fn many(self) -> Option<Vec<T>> {
        match self {
            Transformed::One(_) => None,
            Transformed::Many(items) => Some(items),
        }
    }
}

/// True for the values a sequence transform filters out before building:
/// null, false, zero, and the empty string. Objects and arrays always
/// count as present.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Recursively remove null object members and null array elements.
///
/// Only null is scrubbed. False, zero, and empty strings are legitimate
/// field values (a node with `is_paused: false` must stay unpaused, not
/// defaulted) and are left alone.
pub fn scrub(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                scrub(v);
            }
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            for v in items.iter_mut() {
                scrub(v);
            }
        }
        _ => {}
    }
}

/// Build one model instance from raw JSON.
///
/// Absent and null input produce `T::default()`. Any other input is
/// scrubbed and decoded; a mismatch logs a warning and degrades to
/// `T::default()`.
pub fn build<T>(raw: Option<Value>) -> T
where
    T: DeserializeOwned + Default,
{
    let mut value = match raw {
        None | Some(Value::Null) => return T::default(),
        Some(value) => value,
    };
    scrub(&mut value);
    match serde_json::from_value(value) {
        Ok(built) => built,
        Err(err) => {
            tracing::warn!(
                model = std::any::type_name::<T>(),
                error = %err,
                "payload did not match model, using defaults"
            );
            T::default()
        }
    }
}

/// Build from raw JSON, dispatching on shape.
///
/// A sequence builds element-wise: falsy elements are filtered out first,
/// survivors build in input order. Anything else (including absent input)
/// builds a single instance via [`build`].
pub fn transform<T>(raw: Option<Value>) -> Transformed<T>
where
    T: DeserializeOwned + Default,
{
    match raw {
        Some(Value::Array(items)) => Transformed::Many(
            items
                .into_iter()
                .filter(|item| !is_falsy(item))
                .map(|item| build(Some(item)))
                .collect(),
        ),
        other => Transformed::One(build(other)),
    }
}

/// Sequence-context convenience over [`transform`]: absent input is an
/// empty sequence, a stray single value is a one-element sequence.
pub fn transform_vec<T>(raw: Option<Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    match raw {
        None | Some(Value::Null) => Vec::new(),
        other => match transform(other) {
            Transformed::Many(items) => items,
            Transformed::One(item) => vec![item],
        },
    }
}
