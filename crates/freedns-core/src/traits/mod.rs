//! Core traits for the FreeDNS client
//!
//! This module defines the abstract interfaces the client is built on.
//!
//! - [`Transport`]: HTTP requests plus the cookie store holding the session

pub mod transport;

pub use transport::{HttpResponse, Transport};
