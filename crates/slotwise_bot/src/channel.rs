//! Local message channels.

use async_trait::async_trait;
use slotwise_core::{ConversantId, InboundMessage, OutboundReply};
use slotwise_error::{ChannelError, ChannelErrorKind, ChannelResult};
use slotwise_interface::MessageChannel;
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::debug;

/// Parse a console line of the form `conversant: text`.
///
/// Lines without a `conversant:` prefix are attributed to `default_id`.
/// Blank lines yield `None`.
///
/// # Examples
///
/// ```
/// use slotwise_bot::parse_console_line;
///
/// let msg = parse_console_line("alice: /plan", &"console".into()).unwrap();
/// assert_eq!(msg.conversant_id.as_str(), "alice");
/// assert_eq!(msg.text, "/plan");
///
/// let msg = parse_console_line("25", &"console".into()).unwrap();
/// assert_eq!(msg.conversant_id.as_str(), "console");
/// assert!(parse_console_line("   ", &"console".into()).is_none());
/// ```
pub fn parse_console_line(line: &str, default_id: &ConversantId) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(':') {
        Some((id, text))
            if !id.trim().is_empty()
                && !id.contains(char::is_whitespace)
                && !text.trim().is_empty() =>
        {
            Some(InboundMessage::new(id.trim(), text.trim()))
        }
        _ => Some(InboundMessage::new(default_id.clone(), line)),
    }
}

type BoxedReader = Box<dyn AsyncBufRead + Unpin + Send>;
type BoxedWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Line-oriented channel over stdin/stdout.
pub struct ConsoleChannel {
    lines: Mutex<Lines<BoxedReader>>,
    out: Mutex<BoxedWriter>,
    default_id: ConversantId,
}

impl ConsoleChannel {
    /// Read from stdin and write to stdout.
    pub fn stdio() -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Read lines from `reader` and write replies to `writer`.
    pub fn new(
        reader: impl AsyncBufRead + Unpin + Send + 'static,
        writer: impl AsyncWrite + Unpin + Send + 'static,
    ) -> Self {
        let reader: BoxedReader = Box::new(reader);
        Self {
            lines: Mutex::new(reader.lines()),
            out: Mutex::new(Box::new(writer)),
            default_id: ConversantId::new("console"),
        }
    }

    /// Conversant used for lines without an explicit prefix.
    pub fn with_default_id(mut self, id: impl Into<ConversantId>) -> Self {
        self.default_id = id.into();
        self
    }
}

#[async_trait]
impl MessageChannel for ConsoleChannel {
    async fn recv(&self) -> ChannelResult<Option<InboundMessage>> {
        let mut lines = self.lines.lock().await;
        while let Some(line) = lines.next_line().await? {
            if let Some(message) = parse_console_line(&line, &self.default_id) {
                return Ok(Some(message));
            }
        }
        debug!("Console input closed");
        Ok(None)
    }

    async fn send(&self, reply: OutboundReply) -> ChannelResult<()> {
        let mut rendered = format!("[{}] {}", reply.conversant_id, reply.text);
        if let Some(url) = &reply.image_url {
            if !reply.text.is_empty() {
                rendered.push('\n');
                rendered.push_str(&format!("[{}] ", reply.conversant_id));
            }
            rendered.push_str(&format!("image: {}", url));
        }
        rendered.push('\n');

        let mut out = self.out.lock().await;
        out.write_all(rendered.as_bytes())
            .await
            .map_err(|e| ChannelError::new(ChannelErrorKind::Send(e.to_string())))?;
        out.flush()
            .await
            .map_err(|e| ChannelError::new(ChannelErrorKind::Send(e.to_string())))
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// In-memory channel: a fixed inbound script and a log of sent replies.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    inbound: parking_lot::Mutex<VecDeque<InboundMessage>>,
    sent: parking_lot::Mutex<Vec<OutboundReply>>,
}

impl MemoryChannel {
    /// Channel that yields `inbound` in order, then `None`.
    pub fn new(inbound: impl IntoIterator<Item = InboundMessage>) -> Self {
        Self {
            inbound: parking_lot::Mutex::new(inbound.into_iter().collect()),
            sent: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Replies sent so far.
    pub fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().clone()
    }

    /// Replies sent to one conversant, in order.
    pub fn sent_to(&self, id: &ConversantId) -> Vec<OutboundReply> {
        self.sent
            .lock()
            .iter()
            .filter(|reply| &reply.conversant_id == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MessageChannel for MemoryChannel {
    async fn recv(&self) -> ChannelResult<Option<InboundMessage>> {
        Ok(self.inbound.lock().pop_front())
    }

    async fn send(&self, reply: OutboundReply) -> ChannelResult<()> {
        self.sent.lock().push(reply);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_like_text_is_not_split() {
        let msg = parse_console_line("see https://example.com", &"console".into()).unwrap();
        assert_eq!(msg.conversant_id.as_str(), "console");
        assert_eq!(msg.text, "see https://example.com");
    }

    #[tokio::test]
    async fn console_reads_until_eof_skipping_blank_lines() {
        let input: &[u8] = b"alice: /plan\n\n  \nbob: hi\n";
        let channel = ConsoleChannel::new(input, tokio::io::sink());

        let first = channel.recv().await.unwrap().unwrap();
        assert_eq!(first, InboundMessage::new("alice", "/plan"));
        let second = channel.recv().await.unwrap().unwrap();
        assert_eq!(second, InboundMessage::new("bob", "hi"));
        assert!(channel.recv().await.unwrap().is_none());
    }
}
