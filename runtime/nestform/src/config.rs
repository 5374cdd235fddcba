//! Runtime knobs for the decoder: log redaction, whitespace stripping and body size limits.
//!
//! [`DecoderConfig`] can be built in code or, with the `config` feature enabled,
//! loaded from a YAML file and environment variables via [`DecoderConfig::load`].
use crate::redact::Redactor;
use crate::request::BodySizeLimit;
use crate::strip::StripPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
/// The configuration used by [`FormParams::extract`](crate::FormParams::extract).
///
/// Every field is optional: missing values fall back to their defaults.
///
/// ```yaml
/// redaction:
///   keywords: [passw, token, pin]
/// strip:
///   mode: all
/// body_size_limit:
///   mode: enabled
///   max_size: 1048576
/// ```
pub struct DecoderConfig {
    /// Which parameters are hidden when logging.
    pub redaction: Redactor,
    /// Which parameters have their string values trimmed after decoding.
    pub strip: StripPolicy,
    /// The maximum size of urlencoded bodies.
    pub body_size_limit: BodySizeLimit,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redaction(mut self, redaction: Redactor) -> Self {
        self.redaction = redaction;
        self
    }

    pub fn strip(mut self, strip: StripPolicy) -> Self {
        self.strip = strip;
        self
    }

    pub fn body_size_limit(mut self, limit: BodySizeLimit) -> Self {
        self.body_size_limit = limit;
        self
    }
}

#[cfg(feature = "config")]
mod load {
    use std::path::PathBuf;

    use anyhow::Context;
    use figment::{
        Figment,
        providers::{Env, Format, Yaml},
    };

    use super::DecoderConfig;

    /// The file name looked up in the configuration directory.
    pub const CONFIG_FILE_NAME: &str = "nestform.yml";
    /// The prefix of environment variables that override the configuration file.
    ///
    /// Nested keys are separated by `__`, e.g. `NESTFORM_STRIP__MODE=all`.
    pub const ENV_PREFIX: &str = "NESTFORM_";

    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load the decoder configuration")]
    /// The configuration file or the environment variables couldn't be deserialized
    /// into a [`DecoderConfig`].
    pub struct ConfigLoadError(#[source] pub(super) anyhow::Error);

    impl DecoderConfig {
        /// Load the configuration from `{dir}/nestform.yml`, overridden by
        /// `NESTFORM_`-prefixed environment variables.
        ///
        /// A missing file is not an error: defaults are used for everything
        /// that isn't set via environment variables.
        pub fn load<Dir>(dir: Dir) -> Result<Self, ConfigLoadError>
        where
            Dir: Into<PathBuf>,
        {
            let dir = dir.into();
            let span = tracing::info_span!(
                "Loading decoder configuration",
                configuration.directory = %dir.display(),
            );
            let _guard = span.enter();
            let figment = Figment::new()
                .merge(Yaml::file(dir.join(CONFIG_FILE_NAME)))
                .merge(Env::prefixed(ENV_PREFIX).split("__"));
            figment
                .extract()
                .context("Failed to load hierarchical configuration")
                .map_err(ConfigLoadError)
        }
    }
}

#[cfg(feature = "config")]
pub use load::{CONFIG_FILE_NAME, ConfigLoadError, ENV_PREFIX};
