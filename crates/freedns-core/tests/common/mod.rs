//! Test doubles and common utilities for console contract tests
//!
//! [`FakeConsole`] is an in-memory stand-in for the FreeDNS web console.
//! It serves pages shaped like the real ones (positional tables, inline
//! `<li><font>` error banners, truncated destinations) so the client runs
//! unchanged against it.

#![allow(dead_code)]

use freedns_core::error::Result;
use freedns_core::{FreeDnsConfig, HttpResponse, Transport};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://freedns.test";
pub const LOGIN: &str = "someone";
pub const PASSWORD: &str = "correct-horse";
pub const SESSION_TOKEN: &str = "session-0123456789";
pub const COOKIE_NAME: &str = "dns_cookie";

/// Destinations longer than this are shown truncated in the listing
pub const LISTING_VALUE_WIDTH: usize = 30;

/// A request seen by the fake console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub method: &'static str,
    pub url: String,
    pub form: Vec<(String, String)>,
}

impl SeenRequest {
    /// Path without the base URL and query string
    pub fn path(&self) -> &str {
        let rest = self.url.strip_prefix(BASE_URL).unwrap_or(&self.url);
        rest.split('?').next().unwrap_or(rest)
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    domain_id: String,
    host: String,
    record_type: String,
    value: String,
    ttl: String,
}

#[derive(Default)]
struct ConsoleState {
    /// id -> name
    domains: BTreeMap<String, String>,
    /// id -> record
    records: BTreeMap<String, StoredRecord>,
    next_id: u64,
    cookies: HashMap<String, String>,
    requests: Vec<SeenRequest>,
    /// Banner rendered on every page while set
    banner: Option<String>,
    /// Status returned by the next request, then cleared
    next_status: Option<(u16, String)>,
}

impl ConsoleState {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        (1000 + self.next_id).to_string()
    }

    fn logged_in(&self) -> bool {
        self.cookies.get(COOKIE_NAME).map(String::as_str) == Some(SESSION_TOKEN)
    }

    fn fqdn(&self, record: &StoredRecord) -> String {
        let domain = self
            .domains
            .get(&record.domain_id)
            .cloned()
            .unwrap_or_default();
        if record.host.is_empty() {
            domain
        } else {
            format!("{}.{}", record.host, domain)
        }
    }
}

/// In-memory FreeDNS console
///
/// Clones share state, so a test keeps one handle for inspection while the
/// client owns another.
#[derive(Clone, Default)]
pub struct FakeConsole {
    state: Arc<Mutex<ConsoleState>>,
}

impl FakeConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a domain, returning its id
    pub fn add_domain(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state.domains.insert(id.clone(), name.to_string());
        id
    }

    /// Pre-populate a record, returning its id
    pub fn add_record(&self, domain_id: &str, host: &str, record_type: &str, value: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state.records.insert(
            id.clone(),
            StoredRecord {
                domain_id: domain_id.to_string(),
                host: host.to_string(),
                record_type: record_type.to_string(),
                value: value.to_string(),
                ttl: "3600".to_string(),
            },
        );
        id
    }

    /// Render `message` as an inline error banner on every page
    pub fn set_banner(&self, message: Option<&str>) {
        self.state.lock().unwrap().banner = message.map(str::to_string);
    }

    /// Answer the next request with `status` and an empty body
    pub fn fail_next_with(&self, status: u16, status_text: &str) {
        self.state.lock().unwrap().next_status = Some((status, status_text.to_string()));
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Number of requests whose path equals `path`
    pub fn requests_to(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path() == path)
            .count()
    }

    pub fn domain_names(&self) -> Vec<String> {
        self.state.lock().unwrap().domains.values().cloned().collect()
    }

    pub fn record_value(&self, record_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(record_id)
            .map(|r| r.value.clone())
    }

    fn handle(&self, method: &'static str, url: &str, form: &[(String, String)]) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(SeenRequest {
            method,
            url: url.to_string(),
            form: form.to_vec(),
        });

        if let Some((status, status_text)) = state.next_status.take() {
            return HttpResponse {
                status,
                status_text,
                body: String::new(),
            };
        }

        let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let query = parse_pairs(query);
        let param = |name: &str| lookup(&query, name);
        let field = |name: &str| lookup(form, name);

        if path == "/zc.php" {
            if field("username") == LOGIN && field("password") == PASSWORD {
                state
                    .cookies
                    .insert(COOKIE_NAME.to_string(), SESSION_TOKEN.to_string());
                return page(&state, "<p>Logged in</p>");
            }
            return page_with_banner("Invalid UserID/Pass", "");
        }

        if !state.logged_in() {
            return page(&state, "<p>Please log in</p>");
        }

        let ack = match path {
            "/domain/" => return page(&state, &domain_list(&state)),
            "/subdomain/" => return page(&state, &record_list(&state, &param("limit"))),
            "/subdomain/edit.php" => {
                let body = edit_form(&state, &param("data_id"));
                return page(&state, &body);
            }
            "/domain/domaincheck.php" => create_domain(&mut state, &param("domain")),
            "/domain/delete.php" => {
                let id = param("domain_id");
                state.domains.remove(&id);
                state.records.retain(|_, r| r.domain_id != id);
                Ok(())
            }
            "/subdomain/save.php" => save_record(&mut state, form),
            "/subdomain/delete2.php" => {
                for (k, v) in form {
                    if k == "data_id[]" {
                        state.records.remove(v);
                    }
                }
                Ok(())
            }
            _ => {
                return HttpResponse {
                    status: 404,
                    status_text: "Not Found".to_string(),
                    body: String::new(),
                };
            }
        };

        match ack {
            Ok(()) => page(&state, "<p>Done</p>"),
            Err(msg) => page_with_banner(&msg, ""),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeConsole {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        Ok(self.handle("GET", url, &[]))
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        Ok(self.handle("POST", url, form))
    }

    fn seed_cookie(&self, _url: &str, name: &str, value: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .cookies
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn cookie(&self, _url: &str, name: &str) -> Option<String> {
        self.state.lock().unwrap().cookies.get(name).cloned()
    }

    fn transport_name(&self) -> &'static str {
        "fake-console"
    }
}

/// Config pointing at the fake console with valid credentials
pub fn credentials_config() -> FreeDnsConfig {
    let mut config = FreeDnsConfig::new();
    config.urls.base = BASE_URL.to_string();
    config.auth.login = LOGIN.to_string();
    config.auth.password = PASSWORD.to_string();
    config
}

/// Config pointing at the fake console with only a session cookie
pub fn cookie_config(cookie_value: &str) -> FreeDnsConfig {
    let mut config = FreeDnsConfig::new();
    config.urls.base = BASE_URL.to_string();
    config.auth.cookie_value = cookie_value.to_string();
    config
}

fn create_domain(state: &mut ConsoleState, name: &str) -> std::result::Result<(), String> {
    if !name.contains('.') {
        return Err(format!("Invalid domain name: {}", name));
    }
    if state.domains.values().any(|d| d == name) {
        return Err(format!("{} is already taken", name));
    }
    let id = state.allocate_id();
    state.domains.insert(id, name.to_string());
    Ok(())
}

fn save_record(state: &mut ConsoleState, form: &[(String, String)]) -> std::result::Result<(), String> {
    let domain_id = lookup(form, "domain_id");
    if !state.domains.contains_key(&domain_id) {
        return Err("Invalid domain".to_string());
    }
    let record_type = lookup(form, "type");
    if record_type.is_empty() {
        return Err("Please select a record type".to_string());
    }

    let record = StoredRecord {
        domain_id,
        host: lookup(form, "subdomain"),
        record_type,
        value: lookup(form, "address"),
        ttl: lookup(form, "ttlalias"),
    };
    let fqdn = state.fqdn(&record);

    match form.iter().find(|(k, _)| k == "data_id") {
        Some((_, id)) => {
            if !state.records.contains_key(id) {
                return Err("Record not found".to_string());
            }
            state.records.insert(id.clone(), record);
        }
        None => {
            let clash = state
                .records
                .values()
                .any(|r| r.record_type == record.record_type && state.fqdn(r) == fqdn);
            if clash {
                return Err(format!("A record already exists for {}", fqdn));
            }
            let id = state.allocate_id();
            state.records.insert(id, record);
        }
    }
    Ok(())
}

fn domain_list(state: &ConsoleState) -> String {
    let menu = "<table><tr><td><a href=\"/menu/\">menu</a></td></tr></table>".repeat(6);
    let rows: String = state
        .domains
        .iter()
        .map(|(id, name)| {
            format!(
                "<tr><td><font><b>{name}</b> (private)</font> \
                 <a href=\"/subdomain/?limit={id}\">[Manage]</a> \
                 <a href=\"/domain/delete.php?domain_id={id}\">[Delete]</a></td></tr>"
            )
        })
        .collect();
    format!(
        "{menu}<table><tr><td><font><b>Domains</b></font></td></tr>{rows}</table>"
    )
}

fn record_list(state: &ConsoleState, domain_id: &str) -> String {
    let rows: String = state
        .records
        .iter()
        .filter(|(_, r)| r.domain_id == domain_id)
        .map(|(id, r)| {
            let shown = if r.value.chars().count() > LISTING_VALUE_WIDTH {
                let cut: String = r.value.chars().take(LISTING_VALUE_WIDTH - 3).collect();
                format!("{}...", cut)
            } else {
                r.value.clone()
            };
            format!(
                "<tr><td><input type=checkbox name=\"data_id[]\" value=\"{id}\"></td>\
                 <td><a href=\"edit.php?data_id={id}\">{}</a></td>\
                 <td>{}</td><td>{shown}</td></tr>",
                state.fqdn(r),
                r.record_type
            )
        })
        .collect();
    format!(
        "<form action=\"delete2.php\" method=post><table>\
         <tr><td></td><td>Subdomain</td><td>Type</td><td>Destination</td></tr>\
         {rows}</table></form>"
    )
}

fn edit_form(state: &ConsoleState, record_id: &str) -> String {
    let Some(record) = state.records.get(record_id) else {
        return "<ul><li><font color=red>Record not found</font></li></ul>".to_string();
    };
    let domain = state
        .domains
        .get(&record.domain_id)
        .cloned()
        .unwrap_or_default();
    format!(
        "<form action=\"save.php?step=2\" method=post><table>\
         <tr><td colspan=2><b>Edit subdomain</b></td></tr>\
         <tr><td>Type:</td><td><select name=type>\
           <option value=A>A</option>\
           <option value=\"{rtype}\" selected>{rtype}</option>\
         </select></td></tr>\
         <tr><td>Subdomain:</td><td><input type=text name=subdomain value=\"{host}\"></td></tr>\
         <tr><td>Domain:</td><td><select name=domain_id>\
           <option value=\"{domain_id}\" selected>{domain} (private)</option>\
         </select></td></tr>\
         <tr><td>Destination:</td><td><textarea name=address>{value}</textarea></td></tr>\
         <tr><td>TTL:</td><td><input type=text name=ttlalias value=\"{ttl}\"></td></tr>\
         <tr><td>Wildcard:</td><td><input type=checkbox name=wildcard></td></tr>\
         </table></form>",
        rtype = record.record_type,
        host = record.host,
        domain_id = record.domain_id,
        value = record.value,
        ttl = record.ttl,
    )
}

fn page(state: &ConsoleState, content: &str) -> HttpResponse {
    match state.banner {
        Some(ref banner) => page_with_banner(banner, content),
        None => HttpResponse::ok(format!("<html><body>{}</body></html>", content)),
    }
}

fn page_with_banner(banner: &str, content: &str) -> HttpResponse {
    HttpResponse::ok(format!(
        "<html><body><ul><li><font color=red>{}</font></li></ul>{}</body></html>",
        banner, content
    ))
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (k.to_string(), v.to_string())
        })
        .collect()
}

fn lookup(pairs: &[(String, String)], name: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}
