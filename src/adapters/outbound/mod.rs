mod maxmind_country_resolver;
mod static_country_resolver;

pub use maxmind_country_resolver::{is_non_public, MaxMindCountryResolver};
pub use static_country_resolver::StaticCountryResolver;
