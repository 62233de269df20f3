//! Server-Sent Events (SSE) stream decoding.
//!
//! The chat backend streams assistant output as `text/event-stream` frames,
//! multiplexing plain token deltas with named control events:
//!
//! ```text
//! data: Hello
//!
//! event: report
//! data: {"markdown":"# Done"}
//!
//! event: chat_end
//! data: sess-1
//! ```
//!
//! [`decode_events`] turns any stream of byte chunks into a lazy stream of
//! [`SseEvent`] frames. Chunks may split lines, frames, or multi-byte UTF-8
//! characters at any offset; the decoder buffers raw bytes and only decodes
//! complete lines, so the output never depends on chunk boundaries.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::client::ChatError;
use crate::model::MESSAGE_EVENT;

/// One decoded SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Name from an `event:` line; `None` on the default channel.
    pub name: Option<String>,

    /// All `data:` payload lines of the frame, joined with `\n`.
    pub data: String,
}

impl SseEvent {
    /// Whether this frame belongs to the default assistant-text channel,
    /// i.e. it is nameless or explicitly named `message`.
    pub fn is_default_channel(&self) -> bool {
        match self.name.as_deref() {
            None | Some(MESSAGE_EVENT) => true,
            Some(_) => false,
        }
    }
}

/// Accumulator for one in-flight SSE frame.
///
/// Lines are fed one at a time; a blank line flushes the pending frame.
/// Frames whose payload never received a `data:` line are discarded, so
/// `event:`-only keep-alives produce nothing.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    event_name: Option<String>,
    data_lines: Vec<String>,
}

impl FrameDecoder {
    /// Create a decoder with no pending frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminating newline).
    ///
    /// Returns a complete frame when the line was a blank terminator and the
    /// pending frame carried payload; `None` otherwise.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.flush();
        }

        if let Some(rest) = line.strip_prefix("event:") {
            self.event_name = Some(rest.trim().to_string());
            return None;
        }

        if let Some(rest) = line.strip_prefix("data:") {
            self.data_lines.push(strip_data_space(rest).to_string());
            return None;
        }

        // Unrecognized line: keep the raw text rather than dropping it.
        self.data_lines.push(line.to_string());
        None
    }

    /// Flush the pending frame, resetting the accumulator.
    ///
    /// A frame with no `data:` lines is discarded regardless of its name.
    pub fn flush(&mut self) -> Option<SseEvent> {
        let name = self.event_name.take();
        if self.data_lines.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data_lines).join("\n");
        Some(SseEvent { name, data })
    }
}

/// Strip the single cosmetic space after `data:`, but only when something
/// follows it. `data: ` with a lone trailing space keeps that space.
fn strip_data_space(rest: &str) -> &str {
    match rest.strip_prefix(' ') {
        Some(value) if !value.is_empty() => value,
        _ => rest,
    }
}

/// Decode a stream of byte chunks into a stream of SSE frames.
///
/// The byte buffer holds undecoded input, so a line or a multi-byte UTF-8
/// character split across chunks is reassembled before decoding. When the
/// source ends, an unterminated trailing fragment is treated as one final
/// line and the pending frame is force-flushed.
///
/// Read errors are yielded in place; the caller decides whether to keep
/// polling (the dispatch layer stops at the first error).
pub fn decode_events<S, E>(byte_stream: S) -> impl Stream<Item = Result<SseEvent, ChatError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<ChatError> + Send,
{
    stream::unfold(
        (Box::pin(byte_stream), Vec::new(), FrameDecoder::new(), false),
        |(mut bytes, mut buffer, mut frames, mut ended)| async move {
            loop {
                // Drain complete lines already buffered.
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let raw: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&raw[..pos]).into_owned();
                    if let Some(event) = frames.feed_line(&line) {
                        return Some((Ok(event), (bytes, buffer, frames, ended)));
                    }
                }

                if ended {
                    // Whatever trails without a newline counts as one final line.
                    if !buffer.is_empty() {
                        let line = String::from_utf8_lossy(&buffer).into_owned();
                        buffer.clear();
                        if let Some(event) = frames.feed_line(&line) {
                            return Some((Ok(event), (bytes, buffer, frames, ended)));
                        }
                    }
                    return frames
                        .flush()
                        .map(|event| (Ok(event), (bytes, buffer, frames, ended)));
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        return Some((Err(e.into()), (bytes, buffer, frames, ended)))
                    }
                    None => ended = true,
                }
            }
        },
    )
}

/// Extension trait for `reqwest::Response` to enable SSE frame streaming.
///
/// # Example
/// ```ignore
/// use aula::sse::SseResponseExt;
/// use futures::StreamExt;
///
/// let response = client.post(url).send().await?;
/// let mut events = std::pin::pin!(response.sse_events());
/// while let Some(event) = events.next().await {
///     println!("{:?}", event?);
/// }
/// ```
pub trait SseResponseExt {
    /// Convert the response body into a stream of decoded SSE frames.
    fn sse_events(self) -> impl Stream<Item = Result<SseEvent, ChatError>> + Send;
}

impl SseResponseExt for reqwest::Response {
    fn sse_events(self) -> impl Stream<Item = Result<SseEvent, ChatError>> + Send {
        decode_events(self.bytes_stream())
    }
}
