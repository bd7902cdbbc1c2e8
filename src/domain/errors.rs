//! Domain Errors
//!
//! Construction-time configuration errors and per-request lookup errors.
//! Callers branch on the variant, never on the message.

/// Errors that prevent a filter from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("either allowed countries or disallowed countries can be set, not both")]
    ConflictingCountryLists,
    #[error("no database file path defined")]
    MissingDatabasePath,
    #[error("failed to open database {path}: {source}")]
    DatabaseOpen {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("filter is enabled but no country resolver was provided")]
    MissingResolver,
}

/// Errors raised while resolving a single candidate IP to a country.
///
/// Every variant carries the IP string that failed so it can be logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{0} is not a valid IP address")]
    InvalidAddress(String),
    #[error("lookup of {ip} rejected by database: {code}")]
    InvalidQuery { ip: String, code: String },
    #[error("{0} not found in database")]
    NotFound(String),
    #[error("no country recorded for {0}")]
    MissingCountry(String),
    #[error("lookup of {ip} failed: {reason}")]
    Database { ip: String, reason: String },
}

impl LookupError {
    /// The candidate IP this error refers to.
    pub fn ip(&self) -> &str {
        match self {
            Self::InvalidAddress(ip) | Self::NotFound(ip) | Self::MissingCountry(ip) => ip,
            Self::InvalidQuery { ip, .. } | Self::Database { ip, .. } => ip,
        }
    }
}
