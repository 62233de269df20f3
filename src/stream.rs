//! Dispatch of decoded SSE frames to caller-supplied handlers.
//!
//! The handler set is passed once per streaming call. Frames on the default
//! channel (nameless, or explicitly named `message`) are token deltas and go
//! to the chunk handler; named frames go to the event handler. Exactly one
//! terminal callback fires per session: completion on clean end-of-stream,
//! or the error handler followed by the error itself.

use futures::{pin_mut, Stream, StreamExt};
use tracing::debug;

use crate::client::ChatError;
use crate::model::MESSAGE_EVENT;
use crate::sse::SseEvent;

type ChunkFn<'a> = Box<dyn FnMut(&str) + Send + 'a>;
type EventFn<'a> = Box<dyn FnMut(&SseEvent) + Send + 'a>;
type CompleteFn<'a> = Box<dyn FnOnce() + Send + 'a>;
type ErrorFn<'a> = Box<dyn FnOnce(&ChatError) + Send + 'a>;

/// Handler set for one streaming chat call.
///
/// The chunk handler is required; the other slots are optional.
///
/// # Example
/// ```rust
/// use aula::stream::StreamHandlers;
///
/// let mut answer = String::new();
/// let handlers = StreamHandlers::new(|chunk| answer.push_str(chunk))
///     .on_complete(|| println!("done"));
/// ```
pub struct StreamHandlers<'a> {
    on_chunk: ChunkFn<'a>,
    on_event: Option<EventFn<'a>>,
    on_complete: Option<CompleteFn<'a>>,
    on_error: Option<ErrorFn<'a>>,
}

impl<'a> StreamHandlers<'a> {
    /// Create a handler set with the required token-delta handler.
    pub fn new(on_chunk: impl FnMut(&str) + Send + 'a) -> Self {
        Self {
            on_chunk: Box::new(on_chunk),
            on_event: None,
            on_complete: None,
            on_error: None,
        }
    }

    /// Receive named, non-`message` events (`chat_end`, `report`, ...).
    ///
    /// Without this slot, named events with a non-empty payload are
    /// forwarded through the chunk handler instead of being dropped.
    pub fn on_event(mut self, handler: impl FnMut(&SseEvent) + Send + 'a) -> Self {
        self.on_event = Some(Box::new(handler));
        self
    }

    /// Called exactly once after all frames, on clean end-of-stream.
    pub fn on_complete(mut self, handler: impl FnOnce() + Send + 'a) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    /// Called exactly once if the request or a read fails. The error is
    /// still returned to the caller afterwards.
    pub fn on_error(mut self, handler: impl FnOnce(&ChatError) + Send + 'a) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Route one frame to the right channel.
    fn handle(&mut self, event: &SseEvent) {
        match event.name.as_deref() {
            None => {
                // A flush that carried neither name nor text is a no-op,
                // while an explicit `message` frame below fires even when
                // empty.
                if !event.data.is_empty() {
                    (self.on_chunk)(&event.data);
                }
            }
            Some(MESSAGE_EVENT) => (self.on_chunk)(&event.data),
            Some(name) => {
                if event.data.is_empty() {
                    return;
                }
                match self.on_event.as_mut() {
                    Some(handler) => handler(event),
                    None => {
                        debug!(event = name, "no event handler, forwarding payload as text");
                        (self.on_chunk)(&event.data);
                    }
                }
            }
        }
    }

    /// Fire the completion handler, consuming the set.
    pub(crate) fn complete(mut self) {
        if let Some(handler) = self.on_complete.take() {
            handler();
        }
    }

    /// Fire the error handler and hand the error back for propagation.
    pub(crate) fn fail(mut self, error: ChatError) -> ChatError {
        if let Some(handler) = self.on_error.take() {
            handler(&error);
        }
        error
    }
}

/// Drive a decoded frame stream to completion.
///
/// Frames are dispatched strictly in arrival order. The first read error
/// stops the session: the error handler fires, no further frames are
/// delivered, and the error is returned. On clean end-of-stream the
/// completion handler fires instead.
pub async fn dispatch_stream<S>(
    events: S,
    mut handlers: StreamHandlers<'_>,
) -> Result<(), ChatError>
where
    S: Stream<Item = Result<SseEvent, ChatError>> + Send,
{
    pin_mut!(events);
    while let Some(item) = events.next().await {
        match item {
            Ok(event) => handlers.handle(&event),
            Err(error) => return Err(handlers.fail(error)),
        }
    }
    handlers.complete();
    Ok(())
}
