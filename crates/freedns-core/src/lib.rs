// # freedns-core
//
// Client library for the FreeDNS (freedns.afraid.org) web console.
//
// The console has no API: every operation is an HTML page fetched with the
// session cookie, and results are read back out of the page by position.
//
// ## Architecture Overview
//
// - **Transport**: Trait for HTTP access plus a persistent cookie store
// - **FreeDnsClient**: Client context running every console operation
// - **PageExtractor**: Per-page positional extraction of models and banners
// - **FreeDnsConfig**: Endpoint templates, credentials and page layouts
//
// ## Design Principles
//
// 1. **Transport-Agnostic**: HTTP lives behind a trait, core never opens sockets
// 2. **Layouts Are Data**: Every table/row/cell index is named and overridable
// 3. **No Caching**: Every call reflects the console at request time
// 4. **Library-First**: The demo binary only wires config and a transport

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod template;
pub mod traits;

// Re-export core types for convenience
pub use client::{FreeDnsClient, Session};
pub use config::{AuthConfig, FreeDnsConfig, HttpConfig, UrlsConfig};
pub use error::{Error, Result};
pub use extract::{PageLayouts, Scraped};
pub use model::{Domain, DomainMap, Record, RecordDetails, RecordForm, RecordMap, find_record_ids};
pub use traits::{HttpResponse, Transport};
