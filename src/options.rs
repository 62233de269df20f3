//! Client configuration options.

use std::collections::HashMap;
use std::time::Duration;

/// Default base URL of the chat backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for a [`ChatClient`](crate::client::ChatClient).
///
/// Covers transport concerns (endpoint, timeout, proxy, extra headers) and
/// the default user identity attached to outgoing chat requests that do not
/// carry one themselves.
///
/// # Example
/// ```rust
/// use aula::options::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new("http://localhost:8080")
///     .with_timeout(Duration::from_secs(30))
///     .with_user_id("student-42");
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL for all endpoints (trailing slash optional).
    pub base_url: String,

    /// Request timeout. Leave unset so long-lived streams are not cut off.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL.
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in every request.
    pub extra_headers: Option<HashMap<String, String>>,

    /// Default user identity, applied to chat requests without a `user_id`.
    pub user_id: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            proxy: None,
            extra_headers: None,
            user_id: None,
        }
    }
}

impl ClientOptions {
    /// Create options pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the default user identity.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
