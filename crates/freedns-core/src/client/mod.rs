//! FreeDNS client context
//!
//! The FreeDnsClient is responsible for:
//! - Holding the configured endpoints, page layouts and session
//! - Turning each public operation into one page request
//! - Running the matching extractor over the response
//! - Surfacing the console's inline errors as [`Error::ProviderReported`]
//!
//! ## Architecture
//!
//! ```text
//!                      ┌────────────────┐
//!   operation ───────▶ │ FreeDnsClient  │
//!                      └────────────────┘
//!                              │
//!        ┌─────────────────────┼──────────────────────┐
//!        │                     │                      │
//!        ▼                     ▼                      ▼
//! ┌─────────────┐      ┌──────────────┐       ┌──────────────┐
//! │  template   │      │  Transport   │       │   extract    │
//! │ (resolve)   │      │ (fetch page) │       │ (scrape)     │
//! └─────────────┘      └──────────────┘       └──────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! 1. Resolve the endpoint template with the operation's ids
//! 2. Fetch the page (non-2xx is fatal for the operation)
//! 3. Extract the model and the error banner
//! 4. Listings return both; mutations turn a banner into an error
//!
//! Nothing is cached: every call reflects the console at request time.

pub mod fetch;
pub mod session;

pub use fetch::{Method, PageRequest};
pub use session::Session;

use crate::config::{AuthConfig, FreeDnsConfig, UrlsConfig};
use crate::error::{Error, Result};
use crate::extract::{AckPage, PageExtractor, PageLayouts, Scraped, scrape};
use crate::model::{DomainMap, RecordDetails, RecordForm, RecordMap};
use crate::template::{self, Placeholder};
use crate::traits::Transport;
use tracing::{debug, info, warn};

/// Client context for one console account
///
/// ## Lifecycle
///
/// 1. Create with [`FreeDnsClient::new()`] (or [`FreeDnsClient::connect()`])
/// 2. Authenticate with [`FreeDnsClient::authenticate()`]
/// 3. Call operations; re-authenticate when the session expires
///
/// ## Threading
///
/// Operations run strictly one request after another. The cookie store
/// inside the transport is shared state; use one client per task.
pub struct FreeDnsClient {
    /// Base URL and endpoint templates
    urls: UrlsConfig,

    /// Credentials used by authenticate()
    auth: AuthConfig,

    /// Positional selectors per page type
    layouts: PageLayouts,

    /// Current session token
    session: Session,

    /// HTTP access and cookie store
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for FreeDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreeDnsClient")
            .field("base", &self.urls.base)
            .field("auth", &self.auth)
            .field("session", &self.session)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl FreeDnsClient {
    /// Create a client without touching the network
    ///
    /// # Returns
    ///
    /// - `Ok(FreeDnsClient)`: unauthenticated client
    /// - `Err(Error::Config)`: invalid configuration, including missing
    ///   credentials with no cookie fallback
    pub fn new(config: FreeDnsConfig, transport: Box<dyn Transport>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            session: Session::new(config.auth.cookie_name.clone()),
            urls: config.urls,
            auth: config.auth,
            layouts: config.layout,
            transport,
        })
    }

    /// Create a client and authenticate it
    pub async fn connect(config: FreeDnsConfig, transport: Box<dyn Transport>) -> Result<Self> {
        let mut client = Self::new(config, transport)?;
        client.authenticate().await?;
        Ok(client)
    }

    /// Log in (or adopt the configured cookie) and store the session token
    pub async fn authenticate(&mut self) -> Result<String> {
        let token = session::authenticate(self.transport.as_ref(), &self.urls, &self.auth).await?;
        self.session.set_token(token.clone());
        Ok(token)
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Page layouts in use
    pub fn layouts(&self) -> &PageLayouts {
        &self.layouts
    }

    /// List the account's domains
    ///
    /// A banner on the page is returned alongside whatever was extracted.
    pub async fn list_domains(&self) -> Result<Scraped<DomainMap>> {
        let url = self.url(&self.urls.get_domains, &[]);
        self.scrape_page(&PageRequest::get(url), &self.layouts.domains)
            .await
    }

    /// Add a domain to the account
    ///
    /// The console answers with a check page; any banner on it is the
    /// reason the domain was refused.
    pub async fn create_domain(&self, name: &str) -> Result<()> {
        require("domain name", name)?;
        info!("Creating domain {}", name);

        let url = self.url(&self.urls.create_domain, &[(Placeholder::Domain, name)]);
        self.submit(&PageRequest::get(url)).await
    }

    /// Remove a domain from the account
    pub async fn delete_domain(&self, domain_id: &str) -> Result<()> {
        require("domain id", domain_id)?;
        info!("Deleting domain {}", domain_id);

        let url = self.url(&self.urls.delete_domain, &[(Placeholder::DomainId, domain_id)]);
        self.submit(&PageRequest::get(url)).await
    }

    /// List the records of a domain, keyed by record id
    ///
    /// Values the listing shows truncated are replaced with the full value
    /// from the record's edit page, one extra request per truncated record.
    pub async fn list_records(&self, domain_id: &str) -> Result<Scraped<RecordMap>> {
        require("domain id", domain_id)?;

        let url = self.url(&self.urls.get_records, &[(Placeholder::DomainId, domain_id)]);
        let mut scraped = self
            .scrape_page(&PageRequest::get(url), &self.layouts.records)
            .await?;

        let truncated: Vec<String> = scraped
            .data
            .values()
            .filter(|record| record.is_truncated())
            .map(|record| record.id.clone())
            .collect();

        for id in truncated {
            debug!("Value of record {} is truncated, fetching details", id);
            let details = self.get_record_details(&id).await?;

            if scraped.banner.is_none() {
                scraped.banner = details.banner;
            }

            if details.data.value.is_empty() {
                warn!("Edit page of record {} had no value, keeping the truncated one", id);
            } else if let Some(record) = scraped.data.get_mut(&id) {
                record.value = details.data.value;
            }
        }

        Ok(scraped)
    }

    /// Read the full view of one record from its edit page
    pub async fn get_record_details(&self, record_id: &str) -> Result<Scraped<RecordDetails>> {
        require("record id", record_id)?;

        let url = self.url(
            &self.urls.get_record_details,
            &[(Placeholder::RecordId, record_id)],
        );
        let scraped = self
            .scrape_page(&PageRequest::get(url), &self.layouts.details)
            .await?;

        Ok(scraped.map(|mut details| {
            details.id = record_id.to_string();
            details
        }))
    }

    /// Create a record in a domain
    ///
    /// Same endpoint as [`update_record`](Self::update_record), without a
    /// record id.
    pub async fn create_record(&self, domain_id: &str, form: &RecordForm) -> Result<()> {
        self.save_record(domain_id, None, form).await
    }

    /// Overwrite an existing record
    pub async fn update_record(
        &self,
        domain_id: &str,
        record_id: &str,
        form: &RecordForm,
    ) -> Result<()> {
        require("record id", record_id)?;
        self.save_record(domain_id, Some(record_id), form).await
    }

    /// Delete a record
    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        require("record id", record_id)?;
        info!("Deleting record {}", record_id);

        let url = self.url(&self.urls.delete_record, &[(Placeholder::RecordId, record_id)]);
        let request = PageRequest::post(url, [("data_id[]", record_id), ("submit", "delete selected")]);
        self.submit(&request).await
    }

    /// The save endpoint tells create and update apart only by the presence
    /// of `data_id`.
    async fn save_record(
        &self,
        domain_id: &str,
        record_id: Option<&str>,
        form: &RecordForm,
    ) -> Result<()> {
        require("domain id", domain_id)?;
        info!(
            "{} record {} ({}) in domain {} -> {}",
            if record_id.is_some() { "Updating" } else { "Creating" },
            form.name,
            form.record_type,
            domain_id,
            form.value
        );

        let mut fields = vec![
            ("domain_id", domain_id),
            ("subdomain", form.name.as_str()),
            ("type", form.record_type.as_str()),
            ("address", form.value.as_str()),
            ("ttlalias", form.ttl.as_str()),
        ];
        if let Some(id) = record_id {
            fields.push(("data_id", id));
        }

        let url = self.url(&self.urls.update_record, &[]);
        self.submit(&PageRequest::post(url, fields)).await
    }

    fn url(&self, path_template: &str, params: &[(Placeholder, &str)]) -> String {
        let path = template::resolve(path_template, params);
        let unresolved = template::unresolved(&path);
        if !unresolved.is_empty() {
            warn!("URL {} still contains placeholders {:?}", path, unresolved);
        }
        template::join(&self.urls.base, &path)
    }

    async fn scrape_page<E: PageExtractor>(
        &self,
        request: &PageRequest,
        extractor: &E,
    ) -> Result<Scraped<E::Output>> {
        let body = fetch::fetch(self.transport.as_ref(), request).await?;
        Ok(scrape(&body, extractor))
    }

    /// Fetch an acknowledgement page and fail on its banner
    async fn submit(&self, request: &PageRequest) -> Result<()> {
        let scraped = self.scrape_page(request, &AckPage).await?;
        if let Some(ref msg) = scraped.banner {
            warn!("Console refused {} {}: {}", request.method, request.url, msg);
        }
        scraped.into_result()
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_input(format!("{} cannot be empty", what)));
    }
    Ok(())
}
