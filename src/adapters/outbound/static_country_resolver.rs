//! Static Country Resolver
//!
//! Implements CountryResolver from a fixed in-memory table.

use crate::domain::errors::LookupError;
use crate::domain::ports::CountryResolver;
use crate::domain::value_objects::CountryCode;
use std::collections::HashMap;

/// Resolver over a fixed IP → raw code table.
///
/// Raw codes go through the same normalisation as database answers, so
/// `"-"` maps to private and `"Invalid ..."` to a lookup error.
#[derive(Debug, Clone, Default)]
pub struct StaticCountryResolver {
    entries: HashMap<String, String>,
}

impl StaticCountryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, ip: impl Into<String>, code: impl Into<String>) -> Self {
        self.entries.insert(ip.into(), code.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Into<String>, C: Into<String>> FromIterator<(I, C)> for StaticCountryResolver {
    fn from_iter<T: IntoIterator<Item = (I, C)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(ip, code)| (ip.into(), code.into()))
                .collect(),
        }
    }
}

impl CountryResolver for StaticCountryResolver {
    fn resolve(&self, ip: &str) -> Result<CountryCode, LookupError> {
        let code = self
            .entries
            .get(ip)
            .ok_or_else(|| LookupError::NotFound(ip.to_string()))?;
        CountryCode::from_database_code(ip, code)
    }
}
