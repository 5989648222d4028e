//! Streaming chat over Server-Sent Events
//!
//! Emits one `token` event per streamed fragment, then a single `complete`
//! event carrying the full reply or an `error` event.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::infrastructure::http::error::ApiResult;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::types::MessageRequest;
use crate::services::StreamEvent;

pub async fn stream_chat(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let (events, _handle) = state.streaming.stream_events(&request.message)?;
    let stream = UnboundedReceiverStream::new(events).map(|event| Ok(to_sse(&event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn to_sse(event: &StreamEvent) -> Event {
    let (name, data) = match event {
        StreamEvent::Token(token) => ("token", token),
        StreamEvent::Complete(text) => ("complete", text),
        StreamEvent::Error(message) => ("error", message),
    };
    // SSE field values may not contain carriage returns.
    Event::default().event(name).data(data.replace('\r', ""))
}
