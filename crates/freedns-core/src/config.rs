//! Configuration types for the FreeDNS client
//!
//! Values are layered: built-in defaults, then a YAML file, then environment
//! variables. Every section is `#[serde(default)]`, so a file only needs the
//! keys it changes.
//!
//! ```yaml
//! auth:
//!   login: you@example.com
//!   password: secret
//! layout:
//!   domains:
//!     table_index: 5
//! ```

use crate::error::{Error, Result};
use crate::extract::PageLayouts;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// File read by [`FreeDnsConfig::load`] when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Name of the console's session cookie
pub const DEFAULT_COOKIE_NAME: &str = "dns_cookie";

/// Default HTTP timeout for console requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeDnsConfig {
    /// Base URL and endpoint templates
    pub urls: UrlsConfig,

    /// Credentials and session cookie
    pub auth: AuthConfig,

    /// Transport settings
    pub http: HttpConfig,

    /// Page layout overrides for the scraper
    pub layout: PageLayouts,
}

impl FreeDnsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then `path` if it exists, then the environment
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::new()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Read a YAML file on top of the defaults
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;

        debug!("Loaded config file {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Parse YAML on top of the defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Recognized variables: `URLS_BASE`, `URLS_LOGIN`, `URLS_GET_DOMAINS`,
    /// `URLS_CREATE_DOMAIN`, `URLS_DELETE_DOMAIN`, `URLS_GET_RECORDS`,
    /// `URLS_GET_RECORD_DETAILS`, `URLS_UPDATE_RECORD`, `URLS_DELETE_RECORD`,
    /// `AUTH_LOGIN`, `AUTH_PASSWORD`, `AUTH_COOKIE_NAME`, `AUTH_COOKIE_VALUE`,
    /// `HTTP_TIMEOUT_SECS`, `LAYOUT_DOMAIN_TABLE_INDEX`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let urls = &mut self.urls;
        let auth = &mut self.auth;
        let strings: [(&str, &mut String); 13] = [
            ("URLS_BASE", &mut urls.base),
            ("URLS_LOGIN", &mut urls.login),
            ("URLS_GET_DOMAINS", &mut urls.get_domains),
            ("URLS_CREATE_DOMAIN", &mut urls.create_domain),
            ("URLS_DELETE_DOMAIN", &mut urls.delete_domain),
            ("URLS_GET_RECORDS", &mut urls.get_records),
            ("URLS_GET_RECORD_DETAILS", &mut urls.get_record_details),
            ("URLS_UPDATE_RECORD", &mut urls.update_record),
            ("URLS_DELETE_RECORD", &mut urls.delete_record),
            ("AUTH_LOGIN", &mut auth.login),
            ("AUTH_PASSWORD", &mut auth.password),
            ("AUTH_COOKIE_NAME", &mut auth.cookie_name),
            ("AUTH_COOKIE_VALUE", &mut auth.cookie_value),
        ];

        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                debug!("Config override from environment: {}", key);
                *slot = value;
            }
        }

        if let Some(value) = lookup("HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = parse_number("HTTP_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("LAYOUT_DOMAIN_TABLE_INDEX") {
            self.layout.domains.table_index = parse_number("LAYOUT_DOMAIN_TABLE_INDEX", &value)?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.urls.base.is_empty() {
            return Err(Error::config("Base URL cannot be empty"));
        }

        self.auth.validate()?;

        if self.http.timeout_secs == 0 {
            return Err(Error::config("HTTP timeout must be > 0"));
        }

        self.layout.validate()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} must be a non-negative integer, got {:?}", key, value)))
}

/// Base URL and per-operation path templates
///
/// Templates may carry `{DOMAIN}`, `{DOMAIN_ID}` and `{RECORD_ID}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlsConfig {
    pub base: String,
    pub login: String,
    #[serde(alias = "getdomains")]
    pub get_domains: String,
    #[serde(alias = "createdomain")]
    pub create_domain: String,
    #[serde(alias = "deletedomain")]
    pub delete_domain: String,
    #[serde(alias = "getrecords")]
    pub get_records: String,
    #[serde(alias = "getrecorddetails")]
    pub get_record_details: String,
    #[serde(alias = "updaterecord")]
    pub update_record: String,
    #[serde(alias = "deleterecord")]
    pub delete_record: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            base: "https://freedns.afraid.org".to_string(),
            login: "/zc.php?step=2".to_string(),
            get_domains: "/domain/".to_string(),
            create_domain: "/domain/domaincheck.php?domain={DOMAIN}".to_string(),
            delete_domain: "/domain/delete.php?domain_id={DOMAIN_ID}".to_string(),
            get_records: "/subdomain/?limit={DOMAIN_ID}".to_string(),
            get_record_details: "/subdomain/edit.php?data_id={RECORD_ID}".to_string(),
            update_record: "/subdomain/save.php?step=2".to_string(),
            delete_record:
                "/subdomain/delete2.php?data_id%5B%5D={RECORD_ID}&submit=delete+selected"
                    .to_string(),
        }
    }
}

/// Console credentials
///
/// Either `login` + `password`, or a `cookie_value` taken from a browser
/// session, must be present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub login: String,
    /// ⚠️ NEVER log this value
    pub password: String,
    #[serde(alias = "cookiename")]
    pub cookie_name: String,
    /// ⚠️ NEVER log this value
    #[serde(alias = "cookievalue")]
    pub cookie_value: String,
}

// Custom Debug implementation that hides secrets
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("login", &self.login)
            .field("password", &redacted(&self.password))
            .field("cookie_name", &self.cookie_name)
            .field("cookie_value", &redacted(&self.cookie_value))
            .finish()
    }
}

pub(crate) fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<EMPTY>" } else { "<REDACTED>" }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login: String::new(),
            password: String::new(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_value: String::new(),
        }
    }
}

impl AuthConfig {
    /// Login and password are both set
    pub fn has_credentials(&self) -> bool {
        !self.login.is_empty() && !self.password.is_empty()
    }

    /// A pre-existing session cookie is set
    pub fn has_cookie(&self) -> bool {
        !self.cookie_value.is_empty()
    }

    /// Validate the auth configuration
    pub fn validate(&self) -> Result<()> {
        if !self.has_credentials() && !self.has_cookie() {
            return Err(Error::config(
                "Auth not found in configuration: set AUTH_LOGIN and AUTH_PASSWORD, or AUTH_COOKIE_VALUE",
            ));
        }
        if self.cookie_name.is_empty() {
            return Err(Error::config("Session cookie name cannot be empty"));
        }
        Ok(())
    }
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
