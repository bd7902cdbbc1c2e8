//! MaxMind Country Resolver
//!
//! Implements CountryResolver using a MaxMind GeoLite2/GeoIP2 database.

use crate::domain::errors::{ConfigError, LookupError};
use crate::domain::ports::CountryResolver;
use crate::domain::value_objects::{CountryCode, PRIVATE_SENTINEL};
use maxminddb::{MaxMindDBError, Reader};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// MaxMind country resolver.
///
/// The database is read fully into memory once and shared; the reader
/// is `Sync`, so concurrent lookups need no locking.
pub struct MaxMindCountryResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindCountryResolver {
    /// Load a database from a file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let reader = Reader::open_readfile(path).map_err(|e| ConfigError::DatabaseOpen {
            path: path.to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Load a database from bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ConfigError> {
        let reader = Reader::from_source(bytes).map_err(|e| ConfigError::DatabaseOpen {
            path: "<memory>".to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Database type from the metadata, e.g. "GeoLite2-Country".
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl CountryResolver for MaxMindCountryResolver {
    fn resolve(&self, ip: &str) -> Result<CountryCode, LookupError> {
        #[derive(Debug, Deserialize)]
        struct Country {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct CountryResp {
            country: Option<Country>,
            registered_country: Option<Country>,
        }

        let addr: IpAddr = ip
            .parse()
            .map_err(|_| LookupError::InvalidAddress(ip.to_string()))?;

        let resp: CountryResp = match self.reader.lookup(addr) {
            Ok(resp) => resp,
            Err(MaxMindDBError::AddressNotFoundError(_)) if is_non_public(addr) => {
                return CountryCode::from_database_code(ip, PRIVATE_SENTINEL);
            }
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                return Err(LookupError::NotFound(ip.to_string()));
            }
            Err(e) => {
                return Err(LookupError::Database {
                    ip: ip.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        // Some networks only carry the registration country.
        let iso = resp
            .country
            .and_then(|c| c.iso_code)
            .or_else(|| resp.registered_country.and_then(|c| c.iso_code));

        match iso {
            Some(iso) => CountryCode::from_database_code(ip, &iso),
            None if is_non_public(addr) => Ok(CountryCode::Private),
            None => Err(LookupError::MissingCountry(ip.to_string())),
        }
    }
}

/// True for address space no geolocation database attributes to a country.
pub fn is_non_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_non_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_non_public_v4(v4),
            None => is_non_public_v6(v6),
        },
    }
}

fn is_non_public_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_documentation()
        || ip.is_multicast()
        // 0.0.0.0/8 "this network"
        || a == 0
        // 240.0.0.0/4 reserved, includes broadcast
        || a >= 240
        // 100.64.0.0/10 carrier-grade NAT
        || (a == 100 && (b & 0xc0) == 64)
        // 192.0.0.0/24 protocol assignments
        || (a == 192 && b == 0 && c == 0)
        // 198.18.0.0/15 benchmarking
        || (a == 198 && (b & 0xfe) == 18)
}

fn is_non_public_v6(ip: Ipv6Addr) -> bool {
    let [first, second, third, fourth, ..] = ip.segments();
    ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local, fec0::/10 deprecated site local
        || (first & 0xff80) == 0xfe80
        // 2001:db8::/32 documentation
        || (first == 0x2001 && second == 0x0db8)
        // 100::/64 discard-only
        || (first == 0x0100 && second == 0 && third == 0 && fourth == 0)
}
