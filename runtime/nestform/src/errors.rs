//! Errors that can happen when decoding parameters out of a [`ParameterStream`].
//!
//! [`ParameterStream`]: crate::stream::ParameterStream
use http::StatusCode;

use crate::descriptor::ScalarKind;

/// The error returned by [`decode`](crate::decode::decode) when a value can't be decoded.
///
/// Every variant carries the fully-qualified bracket path of the offending
/// parameter (e.g. `items[][id]`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    /// See [`KeyNotFound`] for details.
    KeyNotFound(#[from] KeyNotFound),
    #[error(transparent)]
    /// See [`InvalidLiteral`] for details.
    InvalidLiteral(#[from] InvalidLiteral),
    #[error(transparent)]
    /// See [`UnsupportedSchema`] for details.
    UnsupportedSchema(#[from] UnsupportedSchema),
}

impl DecodeError {
    /// The status code a server should use when rejecting a request because of this error.
    ///
    /// It returns `400 Bad Request` if the caller sent a malformed or incomplete form.
    /// It returns `500 Internal Server Error` if the target shape itself is unsupported,
    /// since that's a programmer error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DecodeError::KeyNotFound(_) | DecodeError::InvalidLiteral(_) => {
                StatusCode::BAD_REQUEST
            }
            DecodeError::UnsupportedSchema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `true` if the error was caused by a missing key.
    ///
    /// This is the only failure that an optional value recovers from.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, DecodeError::KeyNotFound(_))
    }

    pub(crate) fn key_not_found(path: impl Into<String>) -> Self {
        KeyNotFound { path: path.into() }.into()
    }
}

/// A required parameter is missing from the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required parameter `{path}`")]
pub struct KeyNotFound {
    pub(crate) path: String,
}

impl KeyNotFound {
    /// The bracket path of the missing parameter.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A parameter is present, but its value can't be parsed as the expected scalar.
///
/// # Example
///
/// `page=ten` can't be parsed as an `i32`, `active=yes` can't be parsed as a `bool`.
/// A malformed value is never treated as absent, not even for optional parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{path}` is set to `{raw_value}`, which we can't parse as a `{kind}`")]
pub struct InvalidLiteral {
    pub(crate) kind: ScalarKind,
    pub(crate) raw_value: String,
    pub(crate) path: String,
}

impl InvalidLiteral {
    /// The scalar kind we tried to parse.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The value, as it was found in the request.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// The bracket path of the offending parameter.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The target shape can't be decoded from a form.
///
/// This error is caused by programmer errors (e.g. an optional wrapping another optional)
/// and is detected when the [`TypeDescriptor`](crate::TypeDescriptor) is built, whenever possible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported parameter schema: {reason}")]
pub struct UnsupportedSchema {
    pub(crate) reason: String,
}

impl UnsupportedSchema {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the shape was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
