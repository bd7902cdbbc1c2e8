//! Adapters: inbound HTTP surface and outbound geolocation databases.

pub mod inbound;
pub mod outbound;
