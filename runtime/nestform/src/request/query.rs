use crate::request::RequestHead;

/// The percent-decoded `key=value` pairs in the query string, in textual order.
pub(super) fn query_pairs(request_head: &RequestHead) -> impl Iterator<Item = (String, String)> {
    let query = request_head.query().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes()).into_owned()
}
