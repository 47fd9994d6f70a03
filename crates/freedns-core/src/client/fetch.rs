//! Page fetcher
//!
//! One request, one status check, body out. No retries: the console has no
//! documented rate-limit contract, so retry policy is left to the caller.

use crate::error::{Error, Result};
use crate::traits::Transport;
use std::fmt;
use tracing::debug;

/// HTTP method used for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A page to fetch
#[derive(Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: Method,
    pub url: String,
    /// Form fields for POST; ignored for GET
    pub form: Vec<(String, String)>,
}

// Form fields may hold the password, keep them out of Debug output
impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field_names: Vec<&str> = self.form.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("PageRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("form", &field_names)
            .finish()
    }
}

impl PageRequest {
    /// A GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            form: Vec::new(),
        }
    }

    /// A form POST
    pub fn post<K, V>(url: impl Into<String>, form: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: Method::Post,
            url: url.into(),
            form: form
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Issue `request` and return the body of a 2xx response
pub async fn fetch(transport: &dyn Transport, request: &PageRequest) -> Result<String> {
    debug!(
        "[{}] {} {}",
        transport.transport_name(),
        request.method,
        request.url
    );

    let response = match request.method {
        Method::Get => transport.get(&request.url).await?,
        Method::Post => transport.post_form(&request.url, &request.form).await?,
    };

    debug!(
        "[{}] Response status: {}",
        transport.transport_name(),
        response.status
    );

    if !response.is_success() {
        return Err(Error::http_status(response.status, response.status_text));
    }

    Ok(response.body)
}
