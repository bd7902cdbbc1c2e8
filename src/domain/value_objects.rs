//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::errors::LookupError;
use std::collections::hash_set;
use std::collections::HashSet;

/// Sentinel a geolocation database returns for non-public address space.
pub const PRIVATE_SENTINEL: &str = "-";

/// Resolved origin of an IP address.
///
/// Either an ISO 3166-1 alpha-2 country (stored upper-case) or `Private`
/// for addresses no geolocation source can attribute to a country.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CountryCode {
    Country(String),
    Private,
}

impl CountryCode {
    /// Build a country code, normalising to upper-case.
    pub fn country(code: &str) -> Self {
        Self::Country(code.trim().to_uppercase())
    }

    /// Normalise a raw code returned by a geolocation database.
    ///
    /// Codes starting with "invalid" (any case) are the database rejecting
    /// the query and become errors, not countries.
    pub fn from_database_code(ip: &str, code: &str) -> Result<Self, LookupError> {
        let code = code.trim();
        if code.to_lowercase().starts_with("invalid") {
            return Err(LookupError::InvalidQuery {
                ip: ip.to_string(),
                code: code.to_string(),
            });
        }
        if code == PRIVATE_SENTINEL {
            return Ok(Self::Private);
        }
        if code.is_empty() {
            return Err(LookupError::MissingCountry(ip.to_string()));
        }
        Ok(Self::country(code))
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Country(code) => code,
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Distinct client IPs claimed by a request's forwarding headers.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIps {
    ips: HashSet<String>,
}

impl CandidateIps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every comma-separated entry of a header value.
    ///
    /// Entries are trimmed and empty ones skipped. No syntax check is done.
    pub fn add_header_value(&mut self, value: &str) {
        for ip in value.split(',') {
            let ip = ip.trim();
            if !ip.is_empty() {
                self.ips.insert(ip.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn contains(&self, ip: &str) -> bool {
        self.ips.contains(ip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ips.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for CandidateIps {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut ips = Self::new();
        for value in iter {
            ips.add_header_value(value);
        }
        ips
    }
}

impl IntoIterator for CandidateIps {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ips.into_iter()
    }
}
