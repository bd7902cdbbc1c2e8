//! geoblock Library
//!
//! Country-based access control for HTTP services. Exposes the filter
//! components for use as a tower layer, in integration tests and by the
//! forward-auth binary.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::inbound::{candidate_ips_from_headers, GeoBlockLayer, HttpServer};
pub use adapters::outbound::{MaxMindCountryResolver, StaticCountryResolver};
pub use application::GeoBlockService;
pub use config::load_config;
pub use domain::entities::{AllowReason, Decision, DecisionReason, DenyReason, Verdict};
pub use domain::errors::{ConfigError, LookupError};
pub use domain::ports::CountryResolver;
pub use domain::services::CountryPolicy;
pub use domain::value_objects::{CandidateIps, CountryCode};
