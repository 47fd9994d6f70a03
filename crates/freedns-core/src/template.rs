//! URL template resolution
//!
//! Console endpoints are configured as path templates carrying literal
//! placeholder tokens, e.g. `/domain/delete.php?domain_id={DOMAIN_ID}`.
//! Resolution is plain substring replacement: case-sensitive, every
//! occurrence, no escaping. Values containing a placeholder token or
//! characters that need URL encoding are the caller's problem.

use std::fmt;

/// Placeholder tokens understood by [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Domain name, e.g. `example.com`
    Domain,
    /// Provider-assigned domain id
    DomainId,
    /// Provider-assigned record id
    RecordId,
}

impl Placeholder {
    /// Every known placeholder
    pub const ALL: [Placeholder; 3] = [Self::Domain, Self::DomainId, Self::RecordId];

    /// The literal token as it appears in templates
    pub fn token(self) -> &'static str {
        match self {
            Self::Domain => "{DOMAIN}",
            Self::DomainId => "{DOMAIN_ID}",
            Self::RecordId => "{RECORD_ID}",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Substitute `params` into `template`
///
/// Tokens without a matching entry in `params` are left untouched.
pub fn resolve(template: &str, params: &[(Placeholder, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |url, (placeholder, value)| {
            url.replace(placeholder.token(), value)
        })
}

/// Placeholders still present in an already-resolved string
pub fn unresolved(url: &str) -> Vec<Placeholder> {
    Placeholder::ALL
        .into_iter()
        .filter(|p| url.contains(p.token()))
        .collect()
}

/// Join the configured base URL and a resolved path
pub fn join(base: &str, path: &str) -> String {
    format!("{}{}", base, path)
}
