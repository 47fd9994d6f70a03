//! Console session
//!
//! The console identifies a logged-in user by a single cookie (`dns_cookie`
//! by default). The session is either established by posting the login form
//! or seeded from a cookie value copied out of a browser. The cookie lives in
//! the transport's store; [`Session`] only remembers its current value.

use super::fetch::{PageRequest, fetch};
use crate::config::{AuthConfig, UrlsConfig, redacted};
use crate::error::{Error, Result};
use crate::extract::{AckPage, scrape};
use crate::template;
use crate::traits::Transport;
use tracing::{debug, info};

/// Current session token
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie_name: String,
    /// ⚠️ NEVER log this value
    token: Option<String>,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookie_name", &self.cookie_name)
            .field("token", &self.token.as_deref().map(redacted))
            .finish()
    }
}

impl Session {
    /// An unauthenticated session for `cookie_name`
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            token: None,
        }
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Current token, if authenticated
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a token is held
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }
}

/// Establish a session and return its token
///
/// - Fails with [`Error::Config`] before any request when neither
///   credentials nor a cookie are configured
/// - A configured cookie is seeded into the transport first
/// - With credentials, the login form is always posted; a valid seeded
///   cookie makes this a no-op on the console side
/// - An error banner on the login page fails with [`Error::Authentication`]
/// - Without credentials, the seeded cookie is the token
pub async fn authenticate(
    transport: &dyn Transport,
    urls: &UrlsConfig,
    auth: &AuthConfig,
) -> Result<String> {
    auth.validate()?;

    if auth.has_cookie() {
        transport.seed_cookie(&urls.base, &auth.cookie_name, &auth.cookie_value)?;
        debug!("Seeded session cookie {}", auth.cookie_name);
    }

    if !auth.has_credentials() {
        info!("No credentials configured, using the seeded session cookie");
        return Ok(auth.cookie_value.clone());
    }

    info!("Logging in to {} as {}", urls.base, auth.login);
    let request = PageRequest::post(
        template::join(&urls.base, &urls.login),
        [
            ("username", auth.login.as_str()),
            ("password", auth.password.as_str()),
            ("action", "auth"),
        ],
    );
    let body = fetch(transport, &request).await?;

    // A rejected login is a 200 page with a banner; a seeded cookie would
    // otherwise survive in the jar and pass for a session
    if let Some(banner) = scrape(&body, &AckPage).banner {
        return Err(Error::auth(banner));
    }

    let token = transport
        .cookie(&urls.base, &auth.cookie_name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::auth(format!(
                "session cookie {} was not set by the login response",
                auth.cookie_name
            ))
        })?;

    debug!("Session cookie {} obtained", auth.cookie_name);
    Ok(token)
}
