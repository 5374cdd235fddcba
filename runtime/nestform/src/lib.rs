//! Decode Rails-style bracketed form parameters into typed, nested values.
//!
//! An HTTP request carries a flat list of `key=value` pairs (query string,
//! urlencoded body, path parameters). `nestform` reconstructs nested structures
//! out of them, driven by a [`TypeDescriptor`] for each handler parameter:
//!
//! - `name=John` is a scalar named `name`;
//! - `tags[]=a&tags[]=b` is a list named `tags`;
//! - `user[name]=John&user[age]=30` is a record named `user`;
//! - `items[][id]=1&items[][id]=2` is a list of records.
//!
//! The pairs live in a [`ParameterStream`]: each pair can be consumed at most once,
//! so parameters decoded earlier are invisible to the ones that follow.
//!
//! # Example
//!
//! ```rust
//! use nestform::{ParameterStream, Signature, TypeDescriptor, Value};
//!
//! let mut stream: ParameterStream = [
//!     ("items[][id]", "1"),
//!     ("items[][name]", "pen"),
//!     ("items[][id]", "2"),
//! ]
//! .into_iter()
//! .collect();
//! let item = TypeDescriptor::record([
//!     ("id", TypeDescriptor::int32()),
//!     ("name", TypeDescriptor::optional(TypeDescriptor::string())?),
//! ])?;
//! let signature = Signature::new().param("items", TypeDescriptor::list(item))?;
//!
//! let params = signature.decode(&mut stream)?;
//! let items = params.get("items").and_then(Value::as_list).unwrap();
//! assert_eq!(items.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Use [`FormParams::extract`] to go straight from an incoming request to decoded values,
//! and the `serde` bridge in [`de`] to turn them into your own types.
#[cfg(feature = "config")]
pub use config::ConfigLoadError;
pub use config::DecoderConfig;
pub use decode::decode;
pub use descriptor::{ScalarKind, TypeDescriptor};
pub use errors::DecodeError;
pub use extract::{ExtractFormParamsError, FormParams};
pub use redact::Redactor;
pub use signature::{DecodedParams, Signature};
pub use stream::{ParameterPair, ParameterStream};
pub use strip::StripPolicy;
pub use value::{Record, Value};

pub mod config;
pub mod de;
pub mod decode;
pub mod descriptor;
pub mod errors;
pub mod extract;
pub mod key;
pub mod redact;
pub mod request;
pub mod signature;
pub mod stream;
pub mod strip;
pub mod telemetry;
pub mod value;
