//! # aula - Streaming chat client
//!
//! A small client library for a chat backend that streams assistant
//! responses over Server-Sent Events.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Incremental SSE decoding that is independent of chunk boundaries
//! - Multiplexed event dispatch: token deltas plus named control events
//!   (`chat_end`, `report`, `report_error`)
//! - Companion JSON endpoints: title generation, history, health
//!
//! ## Architecture
//!
//! The byte stream of an open response body is decoded lazily into
//! [`SseEvent`] frames ([`sse`]), which are routed to a per-call
//! [`StreamHandlers`] set ([`stream`]). [`ChatClient`] glues the two to the
//! backend's HTTP endpoints ([`client`]).
//!
//! ## Example
//! ```no_run
//! use aula::{ChatApi, ChatClient, ChatRequest, StreamHandlers};
//! use aula::options::ClientOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new(ClientOptions::new("http://localhost:8080"))?;
//!
//!     let mut answer = String::new();
//!     let handlers = StreamHandlers::new(|chunk| answer.push_str(chunk))
//!         .on_event(|event| println!("control event: {:?}", event.name))
//!         .on_complete(|| println!("stream finished"));
//!
//!     client
//!         .stream_chat(ChatRequest::new("What is recursion?"), handlers)
//!         .await?;
//!
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ChatApi, ChatClient, ChatError};
pub use model::ChatRequest;
pub use options::ClientOptions;
pub use sse::SseEvent;
pub use stream::StreamHandlers;
