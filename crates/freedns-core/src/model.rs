//! Domain and record values reconstructed from console pages
//!
//! Everything here is rebuilt from scratch on every fetch; nothing is cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffixes the console appends when it shortens a long value in a listing
pub const TRUNCATION_MARKERS: &[&str] = &["...", "\u{2026}"];

/// A domain owned by (or shared with) the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name, e.g. `example.com`
    pub name: String,
    /// Provider-assigned opaque id
    pub id: String,
}

/// Invertible name <-> id mapping for the account's domains
///
/// Both views are updated together, so a name always maps to exactly one id
/// and vice versa. Inserting a pair evicts any stale pairing of either side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMap {
    by_name: BTreeMap<String, String>,
    by_id: BTreeMap<String, String>,
}

impl DomainMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name/id pair, replacing previous pairings of either side
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        let name = name.into();
        let id = id.into();

        if let Some(old_id) = self.by_name.remove(&name) {
            self.by_id.remove(&old_id);
        }
        if let Some(old_name) = self.by_id.remove(&id) {
            self.by_name.remove(&old_name);
        }

        self.by_name.insert(name.clone(), id.clone());
        self.by_id.insert(id, name);
    }

    /// Id for a domain name
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Domain name for an id
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// Name -> id view
    pub fn by_name(&self) -> &BTreeMap<String, String> {
        &self.by_name
    }

    /// Id -> name view
    pub fn by_id(&self) -> &BTreeMap<String, String> {
        &self.by_id
    }

    /// Number of domains
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no domain was found
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Domains ordered by name
    pub fn domains(&self) -> Vec<Domain> {
        self.by_name
            .iter()
            .map(|(name, id)| Domain {
                name: name.clone(),
                id: id.clone(),
            })
            .collect()
    }
}

impl FromIterator<Domain> for DomainMap {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        let mut map = Self::new();
        for domain in iter {
            map.insert(domain.name, domain.id);
        }
        map
    }
}

/// A record as shown in a domain's record listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned opaque id
    pub id: String,
    /// Fully-qualified name (host + domain)
    pub name: String,
    /// Record type, e.g. `A`, `CNAME`, `TXT`
    pub record_type: String,
    /// Destination; may be shortened by the listing page
    pub value: String,
}

impl Record {
    /// Whether the listing cut the value short
    pub fn is_truncated(&self) -> bool {
        TRUNCATION_MARKERS
            .iter()
            .any(|marker| self.value.ends_with(marker))
    }
}

/// Records of one domain keyed by record id
pub type RecordMap = BTreeMap<String, Record>;

/// Full view of a single record, read from its edit page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDetails {
    /// Provider-assigned opaque id
    pub id: String,
    /// `host.domain`, or just `domain` for the apex
    pub fqdn: String,
    /// Record type
    pub record_type: String,
    /// Host part only
    pub host: String,
    /// Id of the owning domain
    pub domain_id: String,
    /// Name of the owning domain
    pub domain: String,
    /// Untruncated destination
    pub value: String,
    /// TTL as rendered; empty when the console hides it
    pub ttl: String,
    /// `"1"` when the wildcard box is ticked, `"0"` otherwise
    pub wildcard: String,
}

impl RecordDetails {
    /// Whether the record also answers for `*.host.domain`
    pub fn is_wildcard(&self) -> bool {
        self.wildcard == "1"
    }

    /// Summary view of these details
    pub fn to_record(&self) -> Record {
        Record {
            id: self.id.clone(),
            name: self.fqdn.clone(),
            record_type: self.record_type.clone(),
            value: self.value.clone(),
        }
    }
}

/// Fields submitted to the console's save endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordForm {
    /// Host part (`xpto` for `xpto.example.com`)
    pub name: String,
    /// Record type
    pub record_type: String,
    /// Destination
    pub value: String,
    /// TTL, submitted as-is
    pub ttl: String,
}

impl RecordForm {
    /// Create a form with an empty TTL
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl: String::new(),
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = ttl.into();
        self
    }
}

/// Ids of all records named exactly `fqdn`, sorted
///
/// Names are not unique on the console, so every match is returned. The
/// flag is `false` (and the list empty) when nothing matches.
pub fn find_record_ids(records: &RecordMap, fqdn: &str) -> (Vec<String>, bool) {
    let mut ids: Vec<String> = records
        .iter()
        .filter(|(_, record)| record.name == fqdn)
        .map(|(id, _)| id.clone())
        .collect();
    ids.sort();
    let found = !ids.is_empty();
    (ids, found)
}
