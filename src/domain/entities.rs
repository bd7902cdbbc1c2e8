//! Domain Entities - Decisions produced while filtering a request
//!
//! These live for a single request and have no external dependencies.

use crate::domain::errors::LookupError;
use crate::domain::value_objects::CountryCode;

/// Which policy rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    PrivateAllowed,
    PrivateDenied,
    InAllowList,
    NotInAllowList,
    InDenyList,
    NotInDenyList,
    /// Neither list is configured.
    NoRestrictions,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrivateAllowed => "private address allowed",
            Self::PrivateDenied => "private address denied",
            Self::InAllowList => "country in allow list",
            Self::NotInAllowList => "country not in allow list",
            Self::InDenyList => "country in deny list",
            Self::NotInDenyList => "country not in deny list",
            Self::NoRestrictions => "no country restrictions",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy outcome for one resolved country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub country: CountryCode,
    pub reason: DecisionReason,
}

impl Decision {
    pub fn allow(country: CountryCode, reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            country,
            reason,
        }
    }

    pub fn deny(country: CountryCode, reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            country,
            reason,
        }
    }
}

/// Why a request was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// The filter is switched off.
    Disabled,
    /// No forwarding headers named a client. Missing headers are not a
    /// policy violation, unlike an IP that fails to resolve.
    NoCandidates,
    /// Every candidate IP passed the policy.
    Permitted,
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    Policy { ip: String, decision: Decision },
    Lookup { ip: String, error: LookupError },
}

impl DenyReason {
    pub fn ip(&self) -> &str {
        match self {
            Self::Policy { ip, .. } | Self::Lookup { ip, .. } => ip,
        }
    }
}

/// Aggregate outcome for a whole request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}
