//! Decode the parameters of a request handler straight out of an incoming request.
use http::StatusCode;

use crate::config::DecoderConfig;
use crate::errors::DecodeError;
use crate::request::errors::{ExtractParameterStreamError, SizeLimitExceeded};
use crate::request::{BufferedBody, RawPathParams, RequestHead};
use crate::signature::{DecodedParams, Signature};
use crate::stream::ParameterStream;
use crate::telemetry::{FORM_PARAMS, FORM_PARAMS_COUNT, form_params, form_params_count};

#[derive(Debug, Clone, PartialEq, Eq)]
#[doc(alias = "Params")]
/// The parameters of a request handler, decoded from the query string,
/// the urlencoded body and the path parameters of an incoming request.
///
/// # Example
///
/// ```rust
/// use nestform::request::{BufferedBody, RawPathParams, RequestHead};
/// use nestform::{DecoderConfig, FormParams, Signature, TypeDescriptor};
///
/// let (parts, _) = http::Request::get("/search?q=rust&page=2").body(())?.into_parts();
/// let head = RequestHead::from(parts);
/// let mut router = matchit::Router::new();
/// router.insert("/search", ())?;
/// let path_params = RawPathParams::from(router.at("/search")?.params);
///
/// let signature = Signature::new()
///     .param("q", TypeDescriptor::string())?
///     .param("page", TypeDescriptor::optional(TypeDescriptor::int32())?)?;
/// let FormParams(params) = FormParams::extract(
///     &head,
///     &BufferedBody::empty(),
///     &path_params,
///     &signature,
///     &DecoderConfig::default(),
/// )?;
/// let (q, page): (String, Option<u32>) = params.deserialize_positional()?;
/// assert_eq!(q, "rust");
/// assert_eq!(page, Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FormParams(
    /// The decoded values, in the order of the [`Signature`] parameters.
    pub DecodedParams,
);

impl FormParams {
    /// Build the [`ParameterStream`] for the request, decode `signature` against it,
    /// then apply the configured [`StripPolicy`](crate::StripPolicy).
    ///
    /// The body is checked against the configured
    /// [`BodySizeLimit`](crate::request::BodySizeLimit) before any parameter is read.
    pub fn extract(
        request_head: &RequestHead,
        body: &BufferedBody,
        path_params: &RawPathParams<'_, '_>,
        signature: &Signature,
        config: &DecoderConfig,
    ) -> Result<Self, ExtractFormParamsError> {
        body.check_size(config.body_size_limit)?;
        let mut stream = ParameterStream::from_request(request_head, body, path_params)?;
        tracing::debug!(
            { FORM_PARAMS } = form_params(&config.redaction, &stream),
            { FORM_PARAMS_COUNT } = form_params_count(&stream),
            "Decoding form parameters"
        );
        let mut params = signature.decode(&mut stream)?;
        params.strip(&config.strip);
        Ok(FormParams(params))
    }
}

/// The error returned by [`FormParams::extract`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractFormParamsError {
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimit(#[from] SizeLimitExceeded),
    #[error(transparent)]
    /// See [`ExtractParameterStreamError`] for details.
    Stream(#[from] ExtractParameterStreamError),
    #[error(transparent)]
    /// See [`DecodeError`] for details.
    Decode(#[from] DecodeError),
}

impl ExtractFormParamsError {
    /// The status code a server should use when rejecting a request because of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractFormParamsError::SizeLimit(e) => e.status_code(),
            ExtractFormParamsError::Stream(e) => e.status_code(),
            ExtractFormParamsError::Decode(e) => e.status_code(),
        }
    }
}
