//! Hide sensitive parameters when logging the content of a [`ParameterStream`].
use std::fmt;

use crate::stream::ParameterStream;

/// The keywords that mark a parameter as sensitive, unless configured otherwise.
pub const DEFAULT_SENSITIVE_KEYWORDS: &[&str] = &[
    "passw",
    "secret",
    "token",
    "_key",
    "crypt",
    "salt",
    "certificate",
    "otp",
    "ssn",
    "cvv",
    "cvc",
];

/// The placeholder logged in place of a sensitive value.
pub const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// Classify parameter keys as sensitive.
///
/// A key is sensitive if it contains any of the configured keywords
/// (case-sensitive substring match).
/// Redaction only affects logging: it has no effect on decoding.
pub struct Redactor {
    keywords: Vec<String>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_KEYWORDS.iter().copied())
    }
}

impl Redactor {
    pub fn new<I, K>(keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| key.contains(keyword.as_str()))
    }

    /// Render every pair in `stream` as `key: value`, hiding sensitive values.
    ///
    /// The rendering is lazy: nothing is formatted unless the returned value is displayed.
    pub fn render<'a>(&'a self, stream: &'a ParameterStream) -> RedactedParams<'a> {
        RedactedParams {
            redactor: self,
            stream,
        }
    }
}

/// The log representation of a [`ParameterStream`], built by [`Redactor::render`].
pub struct RedactedParams<'a> {
    redactor: &'a Redactor,
    stream: &'a ParameterStream,
}

impl fmt::Display for RedactedParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.stream.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.redactor.is_sensitive(pair.key()) {
                write!(f, "{}: {REDACTED}", pair.key())?;
            } else {
                write!(f, "{pair}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keywords() {
        let redactor = Redactor::default();
        for key in [
            "password",
            "user[password_confirmation]",
            "client_secret",
            "csrf_token",
            "api_key",
            "encrypted",
            "salt",
            "certificate",
            "otp",
            "ssn",
            "card[cvv]",
            "cvc",
        ] {
            assert!(redactor.is_sensitive(key), "`{key}` should be sensitive");
        }
        for key in ["name", "user[email]", "key", "Password", "TOKEN"] {
            assert!(!redactor.is_sensitive(key), "`{key}` shouldn't be sensitive");
        }
    }

    #[test]
    fn custom_keywords() {
        let redactor = Redactor::new(["pin"]);
        assert!(redactor.is_sensitive("card[pin]"));
        assert!(!redactor.is_sensitive("password"));
    }

    #[test]
    fn render_hides_sensitive_values() {
        let stream: ParameterStream = [("user", "ann"), ("password", "hunter2"), ("id", "7")]
            .into_iter()
            .collect();
        let rendered = Redactor::default().render(&stream).to_string();
        insta::assert_snapshot!(rendered, @"user: ann, password: [redacted], id: 7");
    }

    #[test]
    fn render_empty_values() {
        let stream: ParameterStream = [("a", ""), ("token", "")].into_iter().collect();
        assert_eq!(
            Redactor::default().render(&stream).to_string(),
            "a: , token: [redacted]"
        );
    }

    #[test]
    fn render_empty_stream() {
        let stream = ParameterStream::new();
        assert_eq!(Redactor::default().render(&stream).to_string(), "");
    }
}
