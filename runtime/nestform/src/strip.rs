//! Trim whitespace from decoded string values.
use std::collections::BTreeSet;

use crate::value::Value;

/// Which parameters should have their string values trimmed after decoding.
///
/// Stripping happens after a successful decode: it rewrites the decoded values
/// and leaves the [`ParameterStream`](crate::ParameterStream) untouched.
///
/// # Configuration
///
/// ```yaml
/// strip:
///   mode: only
///   params: [name, email]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StripPolicy {
    /// Leave every value as it was sent.
    #[default]
    None,
    /// Trim the values of every parameter.
    All,
    /// Trim the values of the listed parameters only.
    Only { params: BTreeSet<String> },
}

impl StripPolicy {
    /// A policy that trims the given parameters.
    pub fn only<I, P>(params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self::Only {
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn applies_to(&self, param: &str) -> bool {
        match self {
            StripPolicy::None => false,
            StripPolicy::All => true,
            StripPolicy::Only { params } => params.contains(param),
        }
    }

    /// Trim `value` if the policy covers `param`.
    pub fn apply(&self, param: &str, value: &mut Value) {
        if self.applies_to(param) {
            strip_value(value);
        }
    }
}

/// Trim leading and trailing whitespace from every string nested in `value`.
pub fn strip_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_owned();
            }
        }
        Value::Optional(Some(inner)) => strip_value(inner),
        Value::List(items) => items.iter_mut().for_each(strip_value),
        Value::Record(record) => record.values_mut().for_each(strip_value),
        Value::Int32(_) | Value::Int64(_) | Value::Bool(_) | Value::Optional(None) => {}
    }
}
