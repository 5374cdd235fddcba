//! Build a [`ParameterStream`] out of an incoming HTTP request.
//!
//! The stream concatenates, in this order:
//!
//! 1. the query parameters, in textual order;
//! 2. the body parameters, in textual order, if the body is a urlencoded form;
//! 3. the path parameters, in template order, percent-decoded.
//!
//! Changing the order changes the outcome of decoding.
pub use body::{BodySizeLimit, BufferedBody};
pub use path::{EncodedParamValue, RawPathParams, RawPathParamsIter};
pub use request_head::RequestHead;

mod body;
pub mod errors;
mod path;
mod query;
mod request_head;

use crate::stream::ParameterStream;
use errors::ExtractParameterStreamError;

impl ParameterStream {
    /// Collect the parameters of an incoming request.
    ///
    /// If the body isn't a urlencoded form (according to its `Content-Type` header),
    /// it doesn't contribute any parameter.
    /// It fails if a path parameter isn't valid UTF8 once percent-decoded.
    pub fn from_request(
        request_head: &RequestHead,
        body: &BufferedBody,
        path_params: &RawPathParams<'_, '_>,
    ) -> Result<Self, ExtractParameterStreamError> {
        let path_pairs = path::path_pairs(path_params)?;
        let mut stream = ParameterStream::new();
        stream.extend(query::query_pairs(request_head));
        stream.extend(body::body_pairs(&request_head.headers, body));
        stream.extend(path_pairs);
        Ok(stream)
    }
}
