// # reqwest Transport
//
// HTTP transport for freedns-core backed by `reqwest` and its cookie jar.
//
// ## Behavior
//
// - ✅ One HTTP request per call, redirects followed by reqwest
// - ✅ Cookies set by any response are stored and sent on later requests
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Non-2xx responses are returned to the caller, not mapped to errors
// - ❌ NO retry logic (callers decide whether to retry)
// - ❌ NO cookie persistence across processes
//
// ## Security Requirements
//
// - Cookie values NEVER appear in logs or Debug output
// - Form bodies (which carry the password on login) are never logged

use async_trait::async_trait;
use freedns_core::config::{DEFAULT_HTTP_TIMEOUT_SECS, HttpConfig};
use freedns_core::{Error, HttpResponse, Result, Transport};
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP timeout for console requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS);

/// reqwest-backed transport
///
/// The jar is shared with the underlying client, so cookies seeded through
/// [`Transport::seed_cookie`] and cookies set by responses live in one store.
pub struct ReqwestTransport {
    /// HTTP client with the jar installed as cookie provider
    client: reqwest::Client,

    /// Session cookies
    /// ⚠️ NEVER log the contents
    jar: Arc<Jar>,

    timeout: Duration,
}

// Custom Debug implementation that hides the cookie jar
impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("jar", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout
    ///
    /// # Returns
    ///
    /// - `Ok(ReqwestTransport)`: ready to use, empty cookie jar
    /// - `Err(Error::Network)`: the HTTP client could not be built (TLS
    ///   backend initialization failed)
    pub fn new(timeout: Duration) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            jar,
            timeout,
        })
    }

    /// Create a transport from the `http` section of the configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Self::new(config.timeout())
    }

    /// Create a transport with the default timeout
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }

    async fn into_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::config(format!("Invalid URL {}: {}", url, e)))
}

/// Value of `name` in a `Cookie` header (`a=1; b=2`)
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        Self::into_response(response).await
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        tracing::debug!("POST {} ({} form field(s))", url, form.len());

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        Self::into_response(response).await
    }

    fn seed_cookie(&self, url: &str, name: &str, value: &str) -> Result<()> {
        let url = parse_url(url)?;
        self.jar
            .add_cookie_str(&format!("{}={}; Path=/", name, value), &url);
        tracing::debug!("Seeded cookie {} for {}", name, url);
        Ok(())
    }

    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let header = self.jar.cookies(&url)?;
        cookie_value(header.to_str().ok()?, name)
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}
