//! Message envelopes exchanged with the message channel.

use crate::ConversantId;
use serde::{Deserialize, Serialize};

/// A user message delivered by the message channel.
///
/// Delivery order per conversant is assumed FIFO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Who sent the message
    pub conversant_id: ConversantId,
    /// Raw message text
    pub text: String,
}

impl InboundMessage {
    /// Create an inbound message.
    pub fn new(conversant_id: impl Into<ConversantId>, text: impl Into<String>) -> Self {
        Self {
            conversant_id: conversant_id.into(),
            text: text.into(),
        }
    }
}

/// A reply to send back through the message channel.
///
/// # Examples
///
/// ```
/// use slotwise_core::OutboundReply;
///
/// let reply = OutboundReply::text("7", "How old are you?");
/// assert!(reply.image_url.is_none());
///
/// let photo = OutboundReply::image("7", "https://example.com/a.png");
/// assert_eq!(photo.image_url.as_deref(), Some("https://example.com/a.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    /// Recipient
    pub conversant_id: ConversantId,
    /// Reply text (may be empty for image-only replies)
    pub text: String,
    /// Optional image to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OutboundReply {
    /// Create a text reply.
    pub fn text(conversant_id: impl Into<ConversantId>, text: impl Into<String>) -> Self {
        Self {
            conversant_id: conversant_id.into(),
            text: text.into(),
            image_url: None,
        }
    }

    /// Create an image reply.
    pub fn image(conversant_id: impl Into<ConversantId>, url: impl Into<String>) -> Self {
        Self {
            conversant_id: conversant_id.into(),
            text: String::new(),
            image_url: Some(url.into()),
        }
    }
}
