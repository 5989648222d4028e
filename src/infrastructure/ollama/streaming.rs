//! Newline-delimited JSON streaming support for the Ollama chat API
//!
//! With `"stream": true` Ollama answers with one JSON object per line. Each
//! carries a content fragment in `message.content`; the last one has
//! `"done": true`.

use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::warn;

use super::error::OllamaError;
use super::types::ChatResponseBody;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// NDJSON parser over a response byte stream
pub struct NdjsonStreamParser {
    inner: ByteStream,
    buffer: Vec<u8>,
    finished: bool,
}

impl NdjsonStreamParser {
    /// Create a new parser from a byte stream
    pub fn new(
        stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(stream),
            buffer: Vec::new(),
            finished: false,
        }
    }

    /// Parse one line. Blank lines yield nothing.
    fn parse_line(line: &[u8]) -> Option<Result<ChatResponseBody, OllamaError>> {
        let line = trim_ascii(line);
        if line.is_empty() {
            return None;
        }

        match serde_json::from_slice::<ChatResponseBody>(line) {
            Ok(chunk) => match chunk.error {
                Some(message) => Some(Err(OllamaError::StreamError(message))),
                None => Some(Ok(chunk)),
            },
            Err(err) => {
                warn!(error = %err, "Failed to parse streamed chunk");
                Some(Err(OllamaError::SerializationError(err)))
            }
        }
    }

    fn next_buffered_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();
        Some(line)
    }
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

impl Stream for NdjsonStreamParser {
    type Item = Result<ChatResponseBody, OllamaError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.next_buffered_line() {
                if let Some(item) = Self::parse_line(&line) {
                    return Poll::Ready(Some(item));
                }
                continue;
            }

            if self.finished {
                // Final line without a trailing newline.
                if self.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let rest = std::mem::take(&mut self.buffer);
                match Self::parse_line(&rest) {
                    Some(item) => return Poll::Ready(Some(item)),
                    None => return Poll::Ready(None),
                }
            }

            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(err))) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(OllamaError::from(err))));
                }
                Poll::Ready(None) => {
                    self.finished = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
