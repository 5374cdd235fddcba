//! Field names and representations used when logging a decode pass.
//!
//! Each well-known resource comes with:
//!
//! - A constant holding the conventional field name used when logging that resource
//! - A function to compute the conventional log representation of that resource
//!
//! Error-related fields are re-exported from [`tracing_log_error`].
use tracing::Value;

use crate::redact::Redactor;
use crate::stream::ParameterStream;

pub use tracing_log_error::fields::*;

/// The field name for the `key: value` listing of all the parameters in a request.
///
/// Use [`form_params`] to populate the field.
pub const FORM_PARAMS: &str = "form.params";

/// The field name for the number of parameters in a request.
///
/// Use [`form_params_count`] to populate the field.
pub const FORM_PARAMS_COUNT: &str = "form.params.count";

/// The field name for the name of the handler parameter being decoded.
pub const FORM_PARAM_NAME: &str = "form.param.name";

/// The canonical representation for the value in [`FORM_PARAMS`].
///
/// Sensitive values are hidden, according to `redactor`.
pub fn form_params<'a>(redactor: &'a Redactor, stream: &'a ParameterStream) -> impl Value + 'a {
    tracing::field::display(redactor.render(stream))
}

/// The canonical representation for the value in [`FORM_PARAMS_COUNT`].
pub fn form_params_count(stream: &ParameterStream) -> impl Value {
    stream.len() as u64
}
