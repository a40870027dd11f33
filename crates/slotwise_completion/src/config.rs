//! Connection and model settings for the completion API.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use slotwise_error::{UpstreamError, UpstreamErrorKind};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Environment variable names read by [`CompletionConfig::from_env`].
pub(crate) const ENV_BASE_URL: &str = "SLOTWISE_API_BASE_URL";
pub(crate) const ENV_API_KEY: &str = "SLOTWISE_API_KEY";
pub(crate) const ENV_MODEL: &str = "SLOTWISE_MODEL";
pub(crate) const ENV_IMAGE_MODEL: &str = "SLOTWISE_IMAGE_MODEL";

/// Settings for [`OpenAiClient`](crate::OpenAiClient).
///
/// Can be embedded in a TOML file (all fields optional) and then overridden
/// from the environment.
///
/// # Examples
///
/// ```
/// use slotwise_completion::{CompletionConfig, CompletionConfigBuilder};
///
/// let config = CompletionConfigBuilder::default()
///     .base_url("http://localhost:8080")
///     .model("llama-3")
///     .build()
///     .unwrap();
/// assert_eq!(config.chat_url(), "http://localhost:8080/v1/chat/completions");
///
/// let defaults = CompletionConfig::default().with_api_key("sk-test");
/// assert_eq!(defaults.model(), "gpt-4");
/// assert_eq!(defaults.image_size(), "512x512");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", strip_option, into)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct CompletionConfig {
    /// API root, without the `/v1` suffix
    base_url: String,
    /// Bearer token; local servers usually need none
    #[builder(setter(into, strip_option))]
    api_key: Option<String>,
    /// Chat model identifier
    model: String,
    /// Image model identifier; the provider default when absent
    #[builder(setter(into, strip_option))]
    image_model: Option<String>,
    /// Requested image size
    image_size: String,
    /// System persona prepended to every completion
    #[builder(setter(into, strip_option))]
    system_prompt: Option<String>,
    /// Maximum tokens per completion
    #[builder(setter(into, strip_option))]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(setter(into, strip_option))]
    temperature: Option<f32>,
    /// Whole-request timeout in seconds
    timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            image_model: None,
            image_size: "512x512".to_string(),
            system_prompt: Some("You are a helpful personal trainer.".to_string()),
            max_tokens: None,
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl CompletionConfig {
    /// Defaults overridden by the process environment.
    ///
    /// Reads:
    /// - `SLOTWISE_API_BASE_URL` (default: "https://api.openai.com")
    /// - `SLOTWISE_API_KEY` (required unless the base URL is overridden)
    /// - `SLOTWISE_MODEL` (default: "gpt-4")
    /// - `SLOTWISE_IMAGE_MODEL` (optional)
    pub fn from_env() -> Result<Self, UpstreamError> {
        let config = Self::default().with_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup, typically the environment.
    ///
    /// Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.api_key = Some(api_key);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(image_model) = get(ENV_IMAGE_MODEL) {
            self.image_model = Some(image_model);
        }
        self
    }

    /// Check that the settings can reach an API.
    pub fn validate(&self) -> Result<(), UpstreamError> {
        if self.base_url.trim().is_empty() {
            return Err(UpstreamError::new(UpstreamErrorKind::Configuration(
                "base URL is empty".to_string(),
            )));
        }
        if self.model.trim().is_empty() {
            return Err(UpstreamError::new(UpstreamErrorKind::Configuration(
                "model is empty".to_string(),
            )));
        }
        if self.api_key.is_none() && self.base_url == DEFAULT_BASE_URL {
            return Err(UpstreamError::new(UpstreamErrorKind::Configuration(format!(
                "{} not set",
                ENV_API_KEY
            ))));
        }
        Ok(())
    }

    /// Chat completions endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Image generation endpoint.
    pub fn image_url(&self) -> String {
        format!("{}/v1/images/generations", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_replace_defaults() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://localhost:9000/"),
            (ENV_API_KEY, "secret"),
            (ENV_MODEL, "gpt-4o-mini"),
            (ENV_IMAGE_MODEL, "dall-e-3"),
        ]
        .into_iter()
        .collect();

        let config = CompletionConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key().as_deref(), Some("secret"));
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.image_model().as_deref(), Some("dall-e-3"));
        assert_eq!(config.chat_url(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.image_url(), "http://localhost:9000/v1/images/generations");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = CompletionConfig::default().with_overrides_from(|_| Some("  ".to_string()));
        assert_eq!(config, CompletionConfig::default());
    }

    #[test]
    fn hosted_api_requires_key() {
        let err = CompletionConfig::default().validate().unwrap_err();
        assert!(matches!(err.kind, UpstreamErrorKind::Configuration(_)));

        assert!(CompletionConfig::default().with_api_key("k").validate().is_ok());
        assert!(
            CompletionConfig::default()
                .with_base_url("http://localhost:8080")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let config: CompletionConfig = from_json(r#"{"model": "llama-3", "temperature": 0.2}"#);
        assert_eq!(config.model(), "llama-3");
        assert_eq!(*config.temperature(), Some(0.2));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(*config.timeout_secs(), 60);
    }

    fn from_json(json: &str) -> CompletionConfig {
        serde_json::from_str(json).expect("valid config")
    }
}
