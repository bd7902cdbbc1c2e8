//! Country Resolver Port
//!
//! Defines the interface for resolving IP addresses to countries.

use crate::domain::errors::LookupError;
use crate::domain::value_objects::CountryCode;

/// Resolver for IP address to country.
///
/// This is an outbound port that abstracts the geolocation database.
/// Implementations are shared read-only across concurrent requests and
/// must not require external locking.
pub trait CountryResolver: Send + Sync {
    /// Resolve an IP address string to a country.
    ///
    /// The string is taken as received from request headers and may not
    /// be a valid address; that is reported as a `LookupError`. Addresses
    /// in non-public space resolve to `CountryCode::Private`.
    fn resolve(&self, ip: &str) -> Result<CountryCode, LookupError>;
}
