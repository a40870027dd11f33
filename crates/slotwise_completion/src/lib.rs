//! OpenAI-compatible HTTP client for the slotwise dialog bot.
//!
//! [`OpenAiClient`] implements both [`CompletionClient`] and [`ImageClient`]
//! against the `/v1/chat/completions` and `/v1/images/generations` endpoints.
//! Every completion is sent as a two-message conversation: the configured
//! system persona followed by the user prompt.
//!
//! # Example
//!
//! ```no_run
//! use slotwise_completion::{CompletionConfig, OpenAiClient};
//! use slotwise_interface::CompletionClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(CompletionConfig::from_env()?)?;
//! let plan = client.complete("Create a beginner-friendly workout plan.").await?;
//! println!("{}", plan);
//! # Ok(())
//! # }
//! ```
//!
//! [`CompletionClient`]: slotwise_interface::CompletionClient
//! [`ImageClient`]: slotwise_interface::ImageClient

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod request;
mod response;

pub use client::{OpenAiClient, first_choice_content, first_image_url};
pub use config::{CompletionConfig, CompletionConfigBuilder};
pub use request::{ChatCompletionRequest, ImageGenerationRequest, Message};
pub use response::{
    ChatCompletionResponse, Choice, ChoiceMessage, ImageData, ImageGenerationResponse, Usage,
};
