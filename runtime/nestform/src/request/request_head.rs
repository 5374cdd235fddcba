use http::{HeaderMap, Method, Uri, Version};

#[non_exhaustive]
#[derive(Debug)]
/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// It includes the [method](Method), the [URI](Uri),
/// the [HTTP version](Version), and the [headers](HeaderMap).
/// The query string and the `Content-Type` header are the only parts used to
/// build a [`ParameterStream`](crate::ParameterStream).
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.target.query()
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}
