//! HTTP client construction helpers.
//!
//! Applies the transport-level parts of [`ClientOptions`] when building the
//! underlying `reqwest` client and per-request headers.

use reqwest::{Client, RequestBuilder};
use std::collections::HashMap;

use crate::options::ClientOptions;

/// Build a configured HTTP client from client options.
///
/// Applies the timeout and proxy settings; everything else is per-request.
pub fn build_http_client(options: &ClientOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Add extra headers to a request if any are configured.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}
