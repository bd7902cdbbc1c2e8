//! GeoBlock Service - Main application use case
//!
//! Orchestrates the filter logic: resolving every candidate IP of a
//! request, evaluating the country policy and aggregating the result.
//! This is the primary interface for the inbound adapter.

use crate::adapters::outbound::MaxMindCountryResolver;
use crate::config::Config;
use crate::domain::entities::{AllowReason, DenyReason, Verdict};
use crate::domain::errors::ConfigError;
use crate::domain::ports::CountryResolver;
use crate::domain::services::CountryPolicy;
use crate::domain::value_objects::CandidateIps;
use std::sync::Arc;

/// GeoBlock service - main application use case.
///
/// Holds the immutable policy and the shared resolver. One instance is
/// built at startup and shared by every request. The service is enabled
/// exactly when it holds a resolver.
pub struct GeoBlockService {
    name: String,
    policy: CountryPolicy,
    resolver: Option<Arc<dyn CountryResolver>>,
}

impl GeoBlockService {
    /// Create a new service from an already built policy and resolver.
    ///
    /// An enabled service needs a resolver; a disabled one ignores it.
    pub fn new(
        name: impl Into<String>,
        enabled: bool,
        policy: CountryPolicy,
        resolver: Option<Arc<dyn CountryResolver>>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();

        if !enabled {
            tracing::info!(filter = %name, "disabled");
            return Ok(Self {
                name,
                policy,
                resolver: None,
            });
        }

        let resolver = resolver.ok_or(ConfigError::MissingResolver)?;

        Ok(Self {
            name,
            policy,
            resolver: Some(resolver),
        })
    }

    /// Build the service from configuration, opening the MaxMind database.
    ///
    /// The country lists are validated even when the filter is disabled.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let policy = CountryPolicy::new(
            &cfg.allowed_countries,
            &cfg.disallowed_countries,
            cfg.allow_private,
        )?;

        if !cfg.enabled {
            return Self::new(&cfg.name, false, policy, None);
        }

        let path = cfg
            .database_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::MissingDatabasePath)?;

        let resolver = MaxMindCountryResolver::from_file(path)?;
        tracing::info!(
            filter = %cfg.name,
            path,
            database_type = resolver.database_type(),
            "GeoIP database loaded"
        );

        Self::new(
            &cfg.name,
            true,
            policy,
            Some(Arc::new(resolver) as Arc<dyn CountryResolver>),
        )
    }

    /// Decide whether a request carrying these candidate IPs may proceed.
    ///
    /// Any candidate that fails to resolve or is denied by the policy
    /// rejects the whole request; evaluation stops at the first one.
    pub fn check(&self, candidates: &CandidateIps) -> Verdict {
        let Some(resolver) = &self.resolver else {
            return Verdict::Allow(AllowReason::Disabled);
        };

        if candidates.is_empty() {
            tracing::debug!(filter = %self.name, "no forwarded client IP, nothing to check");
            return Verdict::Allow(AllowReason::NoCandidates);
        }

        for ip in candidates.iter() {
            let country = match resolver.resolve(ip) {
                Ok(country) => country,
                Err(error) => {
                    return Verdict::Deny(DenyReason::Lookup {
                        ip: ip.to_string(),
                        error,
                    });
                }
            };

            let decision = self.policy.evaluate(&country);
            tracing::debug!(
                filter = %self.name,
                ip,
                country = %decision.country,
                reason = %decision.reason,
                allowed = decision.allowed,
                "evaluated candidate"
            );

            if !decision.allowed {
                return Verdict::Deny(DenyReason::Policy {
                    ip: ip.to_string(),
                    decision,
                });
            }
        }

        Verdict::Allow(AllowReason::Permitted)
    }

    pub fn is_enabled(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &CountryPolicy {
        &self.policy
    }
}
