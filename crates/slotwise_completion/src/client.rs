use crate::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionConfig, ImageGenerationRequest,
    ImageGenerationResponse,
};
use serde::{Serialize, de::DeserializeOwned};
use slotwise_error::{UpstreamError, UpstreamErrorKind};
use slotwise_interface::{CompletionClient, ImageClient};
use std::time::Duration;
use tracing::instrument;

/// Client for an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url(), model = %config.model()))]
    pub fn new(config: CompletionConfig) -> Result<Self, UpstreamError> {
        tracing::debug!("Creating completion client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::Configuration(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        self.post_json(&self.config.chat_url(), request).await
    }

    /// Send an image generation request
    #[instrument(skip(self, request), fields(size = %request.size))]
    pub async fn image_generation(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, UpstreamError> {
        self.post_json(&self.config.image_url(), request).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, UpstreamError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "Sending request");

        let mut req = self.client.post(url).json(body);
        if let Some(api_key) = self.config.api_key() {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            UpstreamError::new(UpstreamErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "API returned error");
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            };
            return Err(UpstreamError::new(UpstreamErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            UpstreamError::new(UpstreamErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }

    fn chat_request(&self, prompt: &str) -> ChatCompletionRequest {
        let mut request = ChatCompletionRequest::single_turn(
            self.config.model().clone(),
            self.config.system_prompt().as_deref(),
            prompt,
        );
        request.max_tokens = *self.config.max_tokens();
        request.temperature = *self.config.temperature();
        request
    }
}

/// Trimmed text of the first choice.
///
/// # Errors
///
/// Returns `EmptyResponse` when there are no choices or the first one has no
/// text.
pub fn first_choice_content(response: &ChatCompletionResponse) -> Result<String, UpstreamError> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::new(UpstreamErrorKind::EmptyResponse))
}

/// URL of the first generated image.
///
/// # Errors
///
/// Returns `EmptyResponse` when no image carries a URL.
pub fn first_image_url(response: &ImageGenerationResponse) -> Result<String, UpstreamError> {
    response
        .data
        .first()
        .and_then(|image| image.url.clone())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| UpstreamError::new(UpstreamErrorKind::EmptyResponse))
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let response = self.chat_completion(&self.chat_request(prompt)).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "Completion usage");
        }
        first_choice_content(&response)
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

#[async_trait::async_trait]
impl ImageClient for OpenAiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = ImageGenerationRequest {
            prompt: prompt.to_string(),
            n: 1,
            size: self.config.image_size().clone(),
            model: self.config.image_model().clone(),
        };
        let response = self.image_generation(&request).await?;
        first_image_url(&response)
    }
}
