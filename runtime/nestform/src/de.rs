//! Deserialize decoded [`Value`]s into your own types, via `serde`.
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserializer, forward_to_deserialize_any};

use crate::value::Value;

/// Something went wrong when trying to deserialize a decoded [`Value`] into
/// the target type you specified.
///
/// You can use [`ValueDeserializationError::kind`] to get more details about the error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ValueDeserializationError {
    kind: ErrorKind,
}

impl ValueDeserializationError {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Retrieve the details of the error that occurred while deserializing.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl de::Error for ValueDeserializationError {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::new(ErrorKind::Message(msg.to_string()))
    }
}

/// The kinds of errors that can happen when deserializing a [`Value`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A string value couldn't be parsed into the expected type.
    #[error("We can't parse `{value}` as a `{expected_type}`")]
    ParseError {
        /// The decoded string.
        value: String,
        /// The expected type of the value.
        expected_type: &'static str,
    },
    /// There is no decoded parameter with this name.
    #[error("There is no decoded parameter named `{name}`")]
    MissingParam {
        /// The name of the missing parameter.
        name: String,
    },
    /// Catch-all variant for errors that don't fit any other variant.
    #[error("{0}")]
    Message(String),
}

/// A `serde` deserializer over a borrowed [`Value`].
pub struct ValueDeserializer<'de> {
    value: &'de Value,
}

impl<'de> ValueDeserializer<'de> {
    pub fn new(value: &'de Value) -> Self {
        Self { value }
    }
}

impl Value {
    /// Deserialize this value into `T`.
    ///
    /// ```rust
    /// use nestform::Value;
    ///
    /// let value = Value::List(vec![Value::Int32(1), Value::Int32(2)]);
    /// let numbers: Vec<u8> = value.deserialize_into()?;
    /// assert_eq!(numbers, vec![1, 2]);
    /// # Ok::<(), nestform::de::ValueDeserializationError>(())
    /// ```
    pub fn deserialize_into<'de, T>(&'de self) -> Result<T, ValueDeserializationError>
    where
        T: de::Deserialize<'de>,
    {
        T::deserialize(ValueDeserializer::new(self))
    }
}

macro_rules! parse_value {
    ($trait_fn:ident, $visit_fn:ident, $ty:literal) => {
        fn $trait_fn<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: Visitor<'de>,
        {
            match self.value {
                Value::String(s) => {
                    let v = s.trim_ascii().parse().map_err(|_| {
                        ValueDeserializationError::new(ErrorKind::ParseError {
                            value: s.clone(),
                            expected_type: $ty,
                        })
                    })?;
                    visitor.$visit_fn(v)
                }
                _ => self.deserialize_any(visitor),
            }
        }
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = ValueDeserializationError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Int32(n) => visitor.visit_i32(*n),
            Value::Int64(n) => visitor.visit_i64(*n),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Optional(None) => visitor.visit_none(),
            Value::Optional(Some(inner)) => visitor.visit_some(ValueDeserializer::new(inner)),
            Value::List(items) => visitor.visit_seq(SeqDeserializer::new(items.iter())),
            Value::Record(record) => visitor.visit_map(MapDeserializer::new(record.iter())),
        }
    }

    parse_value!(deserialize_i8, visit_i8, "i8");
    parse_value!(deserialize_i16, visit_i16, "i16");
    parse_value!(deserialize_i32, visit_i32, "i32");
    parse_value!(deserialize_i64, visit_i64, "i64");
    parse_value!(deserialize_i128, visit_i128, "i128");
    parse_value!(deserialize_u8, visit_u8, "u8");
    parse_value!(deserialize_u16, visit_u16, "u16");
    parse_value!(deserialize_u32, visit_u32, "u32");
    parse_value!(deserialize_u64, visit_u64, "u64");
    parse_value!(deserialize_u128, visit_u128, "u128");
    parse_value!(deserialize_f32, visit_f32, "f32");
    parse_value!(deserialize_f64, visit_f64, "f64");
    parse_value!(deserialize_char, visit_char, "char");

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Optional(None) => visitor.visit_none(),
            Value::Optional(Some(inner)) => visitor.visit_some(ValueDeserializer::new(inner)),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Optional(None) => visitor.visit_unit(),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(BorrowedStrDeserializer::new(s)),
            Value::Optional(Some(inner)) => {
                ValueDeserializer::new(inner).deserialize_enum(name, variants, visitor)
            }
            other => Err(de::Error::custom(format!(
                "expected a unit enum variant, found {}",
                other.shape()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool str string bytes byte_buf unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

pub(crate) struct SeqDeserializer<I> {
    items: I,
}

impl<I> SeqDeserializer<I> {
    pub(crate) fn new(items: I) -> Self {
        Self { items }
    }
}

impl<'de, I> SeqAccess<'de> for SeqDeserializer<I>
where
    I: Iterator<Item = &'de Value>,
{
    type Error = ValueDeserializationError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.items.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

pub(crate) struct MapDeserializer<'de, I> {
    entries: I,
    value: Option<&'de Value>,
}

impl<'de, I> MapDeserializer<'de, I>
where
    I: Iterator<Item = (&'de String, &'de Value)>,
{
    pub(crate) fn new(entries: I) -> Self {
        Self {
            entries,
            value: None,
        }
    }
}

impl<'de, I> MapAccess<'de> for MapDeserializer<'de, I>
where
    I: Iterator<Item = (&'de String, &'de Value)>,
{
    type Error = ValueDeserializationError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(de::Error::custom("value is missing")),
        }
    }
}
