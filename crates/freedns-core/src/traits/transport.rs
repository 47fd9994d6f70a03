// # Transport Trait
//
// Defines the interface the client uses to talk to the console over HTTP.
//
// ## Implementations
//
// - reqwest with a cookie jar: `freedns-transport-reqwest` crate
// - In-memory fakes in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use freedns_core::Transport;
//
// let transport = /* Transport implementation */;
// let page = transport.get("https://freedns.afraid.org/domain/").await?;
// assert!(page.is_success());
// ```

use async_trait::async_trait;

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code
    pub status: u16,
    /// Reason phrase, e.g. `Not Found`
    pub status_text: String,
    /// Response body, expected to be HTML
    pub body: String,
}

impl HttpResponse {
    /// A `200 OK` response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP access plus a persistent cookie store
///
/// The cookie store is what carries the console session: cookies set by a
/// response must be attached to every later request automatically.
///
/// # Contract
///
/// - One network round trip per `get`/`post_form` call, no retries
/// - Network failures map to [`crate::Error::Network`]
/// - Non-2xx responses are returned, not turned into errors; status policy
///   belongs to the caller
/// - Cookie values must never be logged
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> Result<HttpResponse, crate::Error>;

    /// Issue a POST with an `application/x-www-form-urlencoded` body
    ///
    /// Field order is preserved and names may repeat.
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, crate::Error>;

    /// Put a cookie into the store, scoped to `url`
    fn seed_cookie(&self, url: &str, name: &str, value: &str) -> Result<(), crate::Error>;

    /// Current value of the cookie `name` that would be sent to `url`
    fn cookie(&self, url: &str, name: &str) -> Option<String>;

    /// Transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
