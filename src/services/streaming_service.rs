//! Token streaming
//!
//! [`StreamingChatService`] starts a streamed reply and hands back a
//! [`StreamHandle`] that resolves once the stream finishes. Callers observe
//! tokens either through their own [`StreamingResponseHandler`] or as
//! [`StreamEvent`]s on a channel.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use super::basic_chat_service::require_text;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ChatMessage;
use crate::domain::ports::{StreamingChatModel, StreamingResponseHandler};

/// One event of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Token(String),
    /// Full reply text. Always the last event of a successful stream.
    Complete(String),
    Error(String),
}

impl StreamEvent {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Token(_))
    }
}

/// Forwards handler callbacks to an unbounded channel.
pub struct ChannelStreamHandler {
    sender: mpsc::UnboundedSender<StreamEvent>,
}

impl ChannelStreamHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: StreamEvent) {
        // The receiver going away just means nobody is listening anymore.
        if self.sender.send(event).is_err() {
            debug!("stream listener dropped");
        }
    }
}

impl StreamingResponseHandler for ChannelStreamHandler {
    fn on_token(&self, token: &str) {
        self.send(StreamEvent::Token(token.to_string()));
    }

    fn on_complete(&self, response: &str) {
        self.send(StreamEvent::Complete(response.to_string()));
    }

    fn on_error(&self, error: DomainError) {
        self.send(StreamEvent::Error(error.to_string()));
    }
}

/// Wraps a caller's handler so it sees exactly one terminal callback and the
/// outcome is also delivered to a [`StreamHandle`].
struct CompletingHandler {
    inner: Arc<dyn StreamingResponseHandler>,
    finished: AtomicBool,
    outcome: Mutex<Option<oneshot::Sender<DomainResult<String>>>>,
}

impl CompletingHandler {
    fn new(
        inner: Arc<dyn StreamingResponseHandler>,
    ) -> (Self, oneshot::Receiver<DomainResult<String>>) {
        let (sender, receiver) = oneshot::channel();
        let handler = Self {
            inner,
            finished: AtomicBool::new(false),
            outcome: Mutex::new(Some(sender)),
        };
        (handler, receiver)
    }

    fn finish(&self, outcome: DomainResult<String>) {
        if let Some(sender) = self.outcome.lock().take() {
            let _ = sender.send(outcome);
        }
    }
}

impl StreamingResponseHandler for CompletingHandler {
    fn on_token(&self, token: &str) {
        if !self.finished.load(Ordering::Acquire) {
            self.inner.on_token(token);
        }
    }

    fn on_complete(&self, response: &str) {
        if self.finished.swap(true, Ordering::AcqRel) {
            warn!("ignoring completion after stream already finished");
            return;
        }
        self.inner.on_complete(response);
        self.finish(Ok(response.to_string()));
    }

    fn on_error(&self, error: DomainError) {
        if self.finished.swap(true, Ordering::AcqRel) {
            warn!(%error, "ignoring error after stream already finished");
            return;
        }
        self.inner.on_error(error.clone());
        self.finish(Err(error));
    }
}

/// Resolves to the full reply text, or the stream's error.
#[derive(Debug)]
pub struct StreamHandle {
    receiver: oneshot::Receiver<DomainResult<String>>,
}

impl StreamHandle {
    pub async fn wait(self) -> DomainResult<String> {
        self.receiver.await.unwrap_or_else(|_| {
            Err(DomainError::Provider(
                "stream ended without a terminal event".to_string(),
            ))
        })
    }
}

/// Streams single-message chats.
pub struct StreamingChatService {
    model: Arc<dyn StreamingChatModel>,
}

impl StreamingChatService {
    pub fn new(model: Arc<dyn StreamingChatModel>) -> Self {
        Self { model }
    }

    /// Start streaming a reply to `message` into `handler`.
    ///
    /// Returns as soon as the request is dispatched.
    #[instrument(skip_all, fields(chars = message.len()))]
    pub fn stream_chat(
        &self,
        message: &str,
        handler: Arc<dyn StreamingResponseHandler>,
    ) -> DomainResult<StreamHandle> {
        require_text(message, "message")?;
        let (completing, receiver) = CompletingHandler::new(handler);
        self.model
            .generate_streaming(vec![ChatMessage::user(message)], Arc::new(completing));
        info!("streaming chat started");
        Ok(StreamHandle { receiver })
    }

    /// Start streaming a reply to `message` as a channel of events.
    pub fn stream_events(
        &self,
        message: &str,
    ) -> DomainResult<(mpsc::UnboundedReceiver<StreamEvent>, StreamHandle)> {
        let (handler, events) = ChannelStreamHandler::new();
        let handle = self.stream_chat(message, Arc::new(handler))?;
        Ok((events, handle))
    }
}
