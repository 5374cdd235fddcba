//! Decode all the parameters of a request handler in one pass.
use serde::de::Deserialize;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use tracing::Level;
use tracing_log_error::log_error;

use crate::de::{
    ErrorKind, MapDeserializer, SeqDeserializer, ValueDeserializationError, ValueDeserializer,
};
use crate::decode::decode;
use crate::descriptor::TypeDescriptor;
use crate::errors::{DecodeError, UnsupportedSchema};
use crate::stream::ParameterStream;
use crate::strip::StripPolicy;
use crate::telemetry::FORM_PARAM_NAME;
use crate::value::Value;

/// The ordered list of parameters a request handler expects.
///
/// # Example
///
/// ```rust
/// use nestform::{ParameterStream, Signature, TypeDescriptor};
///
/// let signature = Signature::new()
///     .param("id", TypeDescriptor::int64())?
///     .param("tags", TypeDescriptor::list(TypeDescriptor::string()))?;
///
/// let mut stream: ParameterStream = [("tags[]", "a"), ("id", "42")].into_iter().collect();
/// let params = signature.decode(&mut stream)?;
/// let (id, tags): (i64, Vec<String>) = params.deserialize_positional()?;
/// assert_eq!(id, 42);
/// assert_eq!(tags, vec!["a".to_string()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

/// A named parameter in a [`Signature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    descriptor: TypeDescriptor,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter to the signature.
    ///
    /// It fails if the descriptor tree is not supported.
    pub fn param(
        mut self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Result<Self, UnsupportedSchema> {
        descriptor.validate()?;
        self.params.push(Param {
            name: name.into(),
            descriptor,
        });
        Ok(self)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Decode every parameter, in declaration order, against the same `stream`.
    ///
    /// Pairs consumed by a parameter are not visible to the parameters that follow it.
    /// Decoding stops at the first error.
    pub fn decode(&self, stream: &mut ParameterStream) -> Result<DecodedParams, DecodeError> {
        let mut decoded = Vec::with_capacity(self.params.len());
        for param in &self.params {
            let span = tracing::debug_span!(
                "Decoding parameter",
                { FORM_PARAM_NAME } = %param.name,
            );
            let _guard = span.enter();
            match decode(&param.descriptor, &param.name, stream, 0) {
                Ok(value) => decoded.push((param.name.clone(), value)),
                Err(e) => {
                    if let DecodeError::UnsupportedSchema(_) = e {
                        log_error!(
                            e,
                            level: Level::ERROR,
                            { FORM_PARAM_NAME } = %param.name,
                            "The parameter schema is not supported"
                        );
                    } else {
                        log_error!(
                            e,
                            level: Level::DEBUG,
                            { FORM_PARAM_NAME } = %param.name,
                            "Failed to decode a parameter"
                        );
                    }
                    return Err(e);
                }
            }
        }
        Ok(DecodedParams { params: decoded })
    }
}

/// The values decoded for each parameter of a [`Signature`], in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedParams {
    params: Vec<(String, Value)>,
}

impl DecodedParams {
    /// The value of the first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(name, value)` pairs, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.params.into_iter().map(|(_, value)| value).collect()
    }

    /// Trim string values according to `policy`.
    pub fn strip(&mut self, policy: &StripPolicy) {
        for (name, value) in &mut self.params {
            policy.apply(name, value);
        }
    }

    /// Deserialize the first parameter named `name` into `T`.
    pub fn extract<'de, T>(&'de self, name: &str) -> Result<T, ValueDeserializationError>
    where
        T: Deserialize<'de>,
    {
        let value = self.get(name).ok_or_else(|| {
            ValueDeserializationError::new(ErrorKind::MissingParam {
                name: name.to_owned(),
            })
        })?;
        T::deserialize(ValueDeserializer::new(value))
    }

    /// Deserialize all parameters into `T`, a struct with one field per parameter.
    pub fn deserialize_all<'de, T>(&'de self) -> Result<T, ValueDeserializationError>
    where
        T: Deserialize<'de>,
    {
        let entries = self.params.iter().map(|(name, value)| (name, value));
        T::deserialize(MapAccessDeserializer::new(MapDeserializer::new(entries)))
    }

    /// Deserialize all parameters, positionally, into `T` (usually a tuple).
    pub fn deserialize_positional<'de, T>(&'de self) -> Result<T, ValueDeserializationError>
    where
        T: Deserialize<'de>,
    {
        let values = self.params.iter().map(|(_, value)| value);
        T::deserialize(SeqAccessDeserializer::new(SeqDeserializer::new(values)))
    }
}
