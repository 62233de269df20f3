//! Streaming chat example.
//!
//! Run with:
//! ```bash
//! export AULA_BASE_URL="http://localhost:8080"
//! cargo run --example stream_chat -- "What is recursion?"
//! ```

use std::io::Write;

use aula::model::{ChatEndPayload, ReportPayload, CHAT_END_EVENT, REPORT_EVENT};
use aula::options::ClientOptions;
use aula::{ChatApi, ChatClient, ChatRequest, StreamHandlers};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("AULA_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let message = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What is recursion?".to_string());

    let client = ChatClient::new(ClientOptions::new(base_url).with_user_id("demo-student"))?;

    if !client.health().await {
        eprintln!("Backend is not reachable, streaming anyway...");
    }

    let handlers = StreamHandlers::new(|chunk: &str| {
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    })
    .on_event(|event| match event.name.as_deref() {
        Some(CHAT_END_EVENT) => {
            let payload = ChatEndPayload::parse(&event.data);
            println!("\n\n=== Session finished ({:?}) ===", payload.session_id);
        }
        Some(REPORT_EVENT) => {
            let report = ReportPayload::parse(&event.data);
            println!("\n\n=== Report ===\n{}", report.markdown);
        }
        _ => println!("\n[{}] {}", event.name.as_deref().unwrap_or(""), event.data),
    })
    .on_complete(|| println!("\n\n=== Stream complete ==="))
    .on_error(|error| eprintln!("\nStream failed: {error}"));

    client.stream_chat(ChatRequest::new(message), handlers).await?;

    Ok(())
}
