use bytes::Bytes;
use http::HeaderMap;
use ubyte::{ByteUnit, ToByteUnit};

use crate::request::errors::SizeLimitExceeded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
/// An upper limit on the size of incoming request bodies.
///
/// Check out the documentation of [`BufferedBody`] for more details.
pub enum BodySizeLimit {
    /// There is an active limit on the size of incoming request bodies.
    Enabled {
        /// The maximum size of incoming request bodies, in bytes.
        max_size: ByteUnit,
    },
    /// There is no limit on the size of incoming request bodies.
    Disabled,
}

impl Default for BodySizeLimit {
    fn default() -> Self {
        Self::Enabled {
            max_size: 2.megabytes(),
        }
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
/// The entire body of an incoming request, buffered in memory.
///
/// # Security
///
/// `BufferedBody` enforces a [`BodySizeLimit`] to prevent denial-of-service attacks.
pub struct BufferedBody {
    /// The buffer of bytes that represents the body of the incoming request.
    pub bytes: Bytes,
}

impl BufferedBody {
    /// Wrap the bytes of a request body, checking them against `limit`.
    pub fn new(bytes: impl Into<Bytes>, limit: BodySizeLimit) -> Result<Self, SizeLimitExceeded> {
        let body = Self {
            bytes: bytes.into(),
        };
        body.check_size(limit)?;
        Ok(body)
    }

    /// Fail if the buffered body is larger than `limit`.
    pub fn check_size(&self, limit: BodySizeLimit) -> Result<(), SizeLimitExceeded> {
        if let BodySizeLimit::Enabled { max_size } = limit {
            let actual_size = self.bytes.len() as u64;
            if actual_size > max_size.as_u64() {
                return Err(SizeLimitExceeded {
                    max_size,
                    actual_size,
                });
            }
        }
        Ok(())
    }

    /// A request without a body.
    pub fn empty() -> Self {
        Self {
            bytes: Bytes::new(),
        }
    }
}

/// `true` if the `Content-Type` header is set to `application/x-www-form-urlencoded`.
///
/// Parameters, such as `charset`, are allowed.
pub(super) fn is_urlencoded(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(http::header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return false;
    };
    mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED
}

/// The percent-decoded `key=value` pairs in a urlencoded body, in textual order.
///
/// Bodies with a different content type don't contribute any pair.
pub(super) fn body_pairs<'a>(
    headers: &HeaderMap,
    body: &'a BufferedBody,
) -> impl Iterator<Item = (String, String)> + use<'a> {
    let bytes: &'a [u8] = if is_urlencoded(headers) {
        body.bytes.as_ref()
    } else {
        &[]
    };
    form_urlencoded::parse(bytes).into_owned()
}
