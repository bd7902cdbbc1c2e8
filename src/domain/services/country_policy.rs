//! Country Policy - allow/deny evaluation for a resolved country
//!
//! Pure domain logic with no I/O. Built once at startup and shared
//! read-only by every request.

use crate::domain::entities::{Decision, DecisionReason};
use crate::domain::errors::ConfigError;
use crate::domain::value_objects::CountryCode;
use std::collections::HashSet;

/// Country allow/deny policy plus the private-address rule.
///
/// At most one of the two lists is non-empty; [`CountryPolicy::new`]
/// rejects anything else.
#[derive(Debug, Clone, Default)]
pub struct CountryPolicy {
    allowed: HashSet<String>,
    disallowed: HashSet<String>,
    allow_private: bool,
}

impl CountryPolicy {
    /// Build a policy from configured country codes.
    ///
    /// Codes are trimmed and upper-cased; blank entries are ignored.
    pub fn new<A, D, S>(allowed: A, disallowed: D, allow_private: bool) -> Result<Self, ConfigError>
    where
        A: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = normalize(allowed);
        let disallowed = normalize(disallowed);

        if !allowed.is_empty() && !disallowed.is_empty() {
            return Err(ConfigError::ConflictingCountryLists);
        }

        Ok(Self {
            allowed,
            disallowed,
            allow_private,
        })
    }

    /// Decide whether a country may pass.
    ///
    /// Rules are checked in order and the first match wins:
    /// 1. private addresses follow `allow_private` only
    /// 2. allow-list mode admits listed countries only
    /// 3. deny-list mode rejects listed countries only
    /// 4. with no lists everything passes
    pub fn evaluate(&self, country: &CountryCode) -> Decision {
        let code = match country {
            CountryCode::Private => {
                return if self.allow_private {
                    Decision::allow(CountryCode::Private, DecisionReason::PrivateAllowed)
                } else {
                    Decision::deny(CountryCode::Private, DecisionReason::PrivateDenied)
                };
            }
            CountryCode::Country(code) => code.to_uppercase(),
        };

        if !self.allowed.is_empty() {
            return if self.allowed.contains(&code) {
                Decision::allow(country.clone(), DecisionReason::InAllowList)
            } else {
                Decision::deny(country.clone(), DecisionReason::NotInAllowList)
            };
        }

        if !self.disallowed.is_empty() {
            return if self.disallowed.contains(&code) {
                Decision::deny(country.clone(), DecisionReason::InDenyList)
            } else {
                Decision::allow(country.clone(), DecisionReason::NotInDenyList)
            };
        }

        Decision::allow(country.clone(), DecisionReason::NoRestrictions)
    }

    pub fn allow_private(&self) -> bool {
        self.allow_private
    }

    pub fn allowed_countries(&self) -> &HashSet<String> {
        &self.allowed
    }

    pub fn disallowed_countries(&self) -> &HashSet<String> {
        &self.disallowed
    }
}

fn normalize<I, S>(codes: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|c| c.as_ref().trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}
