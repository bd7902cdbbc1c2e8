mod country_resolver;

pub use country_resolver::CountryResolver;
