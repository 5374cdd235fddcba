//! Errors that can happen when building a [`ParameterStream`] out of an incoming request.
//!
//! [`ParameterStream`]: crate::ParameterStream
use std::str::Utf8Error;

use http::StatusCode;
use ubyte::ByteUnit;

/// The error returned by [`ParameterStream::from_request`] when the extraction fails.
///
/// [`ParameterStream::from_request`]: crate::ParameterStream::from_request
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractParameterStreamError {
    #[error(transparent)]
    /// See [`InvalidUtf8InPathParam`] for details.
    InvalidUtf8InPathParameter(#[from] InvalidUtf8InPathParam),
}

impl ExtractParameterStreamError {
    /// The status code a server should use when rejecting a request because of this error.
    ///
    /// It's always `400 Bad Request`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractParameterStreamError::InvalidUtf8InPathParameter(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// One of the percent-decoded path parameters is not a valid UTF8 string.
///
/// # Example
///
/// One of our routes is `/address/{address_id}`.
/// We receive a request with `/address/the%20street` as path: `address_id` is set to
/// `the%20street`, which is decoded into `the street`.
///
/// We could also receive a request using `/address/dirty%DE~%C7%1FY` as path: `address_id`, when
/// decoded, is a sequence of bytes that cannot be interpreted as a well-formed UTF8 string.
/// This error is then returned.
#[error(
    "`{invalid_raw_segment}` cannot be used as `{invalid_key}` \
since it is not a well-formed UTF8 string when percent-decoded"
)]
pub struct InvalidUtf8InPathParam {
    pub(super) invalid_key: String,
    pub(super) invalid_raw_segment: String,
    #[source]
    pub(super) source: Utf8Error,
}

/// The error returned by [`EncodedParamValue::decode`] when the percent-decoded path parameter
/// is not a valid UTF8 string.
///
/// [`EncodedParamValue::decode`]: super::EncodedParamValue::decode
#[derive(Debug, thiserror::Error)]
#[error("`{invalid_raw_segment}` is not a well-formed UTF8 string when percent-decoded")]
pub struct PercentDecodeError {
    pub(super) invalid_raw_segment: String,
    #[source]
    pub(super) source: Utf8Error,
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is larger than the maximum size limit enforced by this server.")]
#[non_exhaustive]
/// The request body is larger than the maximum size limit enforced by this server.
pub struct SizeLimitExceeded {
    /// The maximum size limit enforced by this server.
    pub max_size: ByteUnit,
    /// The size of the request body, in bytes.
    pub actual_size: u64,
}

impl SizeLimitExceeded {
    /// It's always `413 Payload Too Large`.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::PAYLOAD_TOO_LARGE
    }
}
