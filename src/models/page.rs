//! Paged result envelope.
//!
//! Every list endpoint of the cluster API returns the same envelope:
//! `{count, next, previous, results}`. The envelope normalizes through the
//! same rules as the models it carries.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transform;

/// One page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultPage<T> {
    /// Total number of matching records across all pages.
    pub count: i64,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub previous: Option<String>,
    /// The records on this page.
    pub results: Vec<T>,
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> ResultPage<T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Whether more pages follow this one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T> ResultPage<T>
where
    T: DeserializeOwned + Default,
{
    /// Normalize a raw list payload into a page.
    ///
    /// Handles the standard envelope, bare arrays (a few older endpoints
    /// return those), and absent input. Results are transformed
    /// element-wise with falsy elements filtered out; `count` falls back
    /// to the result length when the envelope omits it.
    pub fn from_value(raw: Option<Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::default(),
            Some(Value::Array(items)) => {
                let results = transform::transform_vec(Some(Value::Array(items)));
                Self {
                    count: results.len() as i64,
                    next: None,
                    previous: None,
                    results,
                }
            }
            Some(Value::Object(mut map)) => {
                let results = transform::transform_vec(map.remove("results"));
                let count = map
                    .get("count")
                    .and_then(Value::as_i64)
                    .unwrap_or(results.len() as i64);
                let next = map
                    .get("next")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let previous = map
                    .get("previous")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Self {
                    count,
                    next,
                    previous,
                    results,
                }
            }
            Some(other) => {
                tracing::warn!(payload = %other, "list payload was not a page or array");
                Self::default()
            }
        }
    }
}
