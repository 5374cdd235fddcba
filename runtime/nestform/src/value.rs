//! Decoded values.
use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// A value decoded out of a [`ParameterStream`](crate::ParameterStream).
///
/// Its shape mirrors the [`TypeDescriptor`](crate::TypeDescriptor) used to decode it.
/// Use [`DecodedParams::extract`](crate::DecodedParams::extract) (or
/// [`Value::deserialize_into`]) to convert it into one of your own types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    /// The outcome of decoding an optional parameter.
    Optional(Option<Box<Value>>),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    /// An absent optional value.
    pub fn none() -> Self {
        Value::Optional(None)
    }

    /// A present optional value.
    pub fn some(value: Value) -> Self {
        Value::Optional(Some(Box::new(value)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// `true` for an absent optional value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::Optional(None))
    }

    /// A short description of the shape of this value, for error messages.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Value::String(_) => "a string",
            Value::Int32(_) => "an i32",
            Value::Int64(_) => "an i64",
            Value::Bool(_) => "a boolean",
            Value::Optional(None) => "an absent optional value",
            Value::Optional(Some(_)) => "an optional value",
            Value::List(_) => "a list",
            Value::Record(_) => "a record",
        }
    }
}

/// The fields of a decoded record, in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }

    pub(crate) fn insert(&mut self, field: String, value: Value) {
        self.0.insert(field, value);
    }

    pub(crate) fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Value> {
        self.0.values_mut()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int32(n) => serializer.serialize_i32(*n),
            Value::Int64(n) => serializer.serialize_i64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Optional(None) => serializer.serialize_none(),
            Value::Optional(Some(inner)) => serializer.serialize_some(inner.as_ref()),
            Value::List(items) => serializer.collect_seq(items),
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter())
    }
}
