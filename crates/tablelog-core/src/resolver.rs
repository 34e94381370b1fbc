//! Caller identity resolution.
//!
//! Resolution order:
//!
//!   request headers → authenticated principal → all-`"unknown"`
//!
//! Resolution never fails. Every problem along the way degrades to the next
//! source and is logged at `warn`.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use tablelog_contracts::identity::{
    Headers, Identity, IdentitySource, ResolvedIdentity, EMAIL_HEADER, PREFERRED_USERNAME_HEADER,
    REAL_IP_HEADER, UNKNOWN,
};

use crate::traits::PrincipalLookup;

/// Read the three identity fields from forwarded-auth headers.
///
/// A missing header yields `"unknown"` for that field. Present values are
/// taken verbatim, without trimming or validation.
pub fn resolve_identity(headers: &Headers) -> Identity {
    let field = |name: &str| headers.get(name).unwrap_or(UNKNOWN).to_string();
    Identity {
        username: field(PREFERRED_USERNAME_HEADER),
        email: field(EMAIL_HEADER),
        source_ip: field(REAL_IP_HEADER),
    }
}

/// Resolves the identity of whoever is performing the current operation.
///
/// Holds an optional principal lookup used when no request context exists.
pub struct IdentityResolver {
    principal: Option<Box<dyn PrincipalLookup>>,
}

impl IdentityResolver {
    pub fn new(principal: Option<Box<dyn PrincipalLookup>>) -> Self {
        Self { principal }
    }

    /// A resolver that never falls back to the principal API.
    pub fn headers_only() -> Self {
        Self { principal: None }
    }

    /// Resolve the caller.
    ///
    /// 1. `Some(headers)` → identity read from headers, `HeaderDerived`
    /// 2. no headers, principal lookup returns a non-blank name →
    ///    `Identity::from_principal`, `PrincipalDerived`
    /// 3. anything else (no lookup configured, lookup error or panic, blank
    ///    name) → `ResolvedIdentity::unknown()`
    pub fn resolve(&self, headers: Option<&Headers>) -> ResolvedIdentity {
        if let Some(headers) = headers {
            let identity = resolve_identity(headers);
            debug!(
                username = %identity.username,
                source = %IdentitySource::HeaderDerived,
                "identity resolved"
            );
            return ResolvedIdentity {
                identity,
                source: IdentitySource::HeaderDerived,
            };
        }

        let Some(lookup) = &self.principal else {
            debug!("no request headers and no principal lookup configured");
            return ResolvedIdentity::unknown();
        };

        let looked_up = panic::catch_unwind(AssertUnwindSafe(|| lookup.current_user_name()));
        match looked_up {
            Ok(Ok(name)) if !name.trim().is_empty() => {
                debug!(
                    username = %name,
                    source = %IdentitySource::PrincipalDerived,
                    "identity resolved"
                );
                ResolvedIdentity {
                    identity: Identity::from_principal(name),
                    source: IdentitySource::PrincipalDerived,
                }
            }
            Ok(Ok(_)) => {
                warn!("principal lookup returned an empty user name");
                ResolvedIdentity::unknown()
            }
            Ok(Err(e)) => {
                warn!(error = %e, "principal lookup failed");
                ResolvedIdentity::unknown()
            }
            Err(_) => {
                warn!("principal lookup panicked");
                ResolvedIdentity::unknown()
            }
        }
    }
}
