use std::borrow::Cow;

use matchit::{Params, ParamsIter};
use percent_encoding::percent_decode_str;

use crate::request::errors::{InvalidUtf8InPathParam, PercentDecodeError};

/// The (raw) path parameters bound by the route template that matched the incoming request.
///
/// # What does "raw" mean?
///
/// Path parameters are URL segments, therefore they must comply with the restrictions that apply
/// to the URL itself. In particular, they can only use ASCII characters.
/// In order to support non-ASCII characters, path parameters are
/// [percent-encoded](https://www.w3schools.com/tags/ref_urlencode.ASP).
///
/// `RawPathParams` does **not** perform any percent-decoding.
/// If `/orders/{order_id}` matches `/orders/123%20456`, `order_id` is set to `123%20456`.
/// Percent-decoding happens when the parameters are appended to a
/// [`ParameterStream`](crate::ParameterStream).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawPathParams<'server, 'request>(Params<'server, 'request>);

impl<'server, 'request> RawPathParams<'server, 'request> {
    /// Returns the number of extracted path parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the value of the first path parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'request str> {
        self.0.get(key)
    }

    /// Returns an iterator over the parameters in the list.
    pub fn iter(&self) -> RawPathParamsIter<'_, 'server, 'request> {
        RawPathParamsIter(self.0.iter())
    }

    /// Returns `true` if no path parameters have been extracted from the request URL.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'k, 'v> From<Params<'k, 'v>> for RawPathParams<'k, 'v> {
    fn from(value: Params<'k, 'v>) -> Self {
        Self(value)
    }
}

/// An iterator over the path parameters extracted via [`RawPathParams`].
pub struct RawPathParamsIter<'extractor, 'server, 'request>(
    ParamsIter<'extractor, 'server, 'request>,
);

impl<'server, 'request> Iterator for RawPathParamsIter<'_, 'server, 'request> {
    type Item = (&'server str, EncodedParamValue<'request>);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(key, value)| (key, EncodedParamValue::new(value)))
    }
}

/// A wrapper around a percent-encoded path parameter, obtained via [`RawPathParams`].
///
/// Use [`decode`](Self::decode) to extract the percent-encoded value.
#[derive(Debug, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct EncodedParamValue<'request>(&'request str);

impl<'request> EncodedParamValue<'request> {
    fn new(s: &'request str) -> Self {
        Self(s)
    }

    /// Percent-decode a raw path parameter.
    ///
    /// If decoding fails, a [`PercentDecodeError`] is returned.
    pub fn decode(&self) -> Result<Cow<'request, str>, PercentDecodeError> {
        percent_decode_str(self.0)
            .decode_utf8()
            .map_err(|e| PercentDecodeError {
                invalid_raw_segment: self.0.to_owned(),
                source: e,
            })
    }

    /// Get a reference to the underlying percent-encoded string.
    pub fn as_str(&self) -> &'request str {
        self.0
    }
}

/// The percent-decoded `key=value` path parameter bindings, in template order.
///
/// Empty values are kept as they are.
pub(super) fn path_pairs(
    path_params: &RawPathParams<'_, '_>,
) -> Result<Vec<(String, String)>, InvalidUtf8InPathParam> {
    path_params
        .iter()
        .map(|(key, value)| {
            if value.as_str().is_empty() {
                return Ok((key.to_owned(), String::new()));
            }
            let decoded = value.decode().map_err(|e| InvalidUtf8InPathParam {
                invalid_key: key.to_owned(),
                invalid_raw_segment: e.invalid_raw_segment,
                source: e.source,
            })?;
            Ok((key.to_owned(), decoded.into_owned()))
        })
        .collect()
}
