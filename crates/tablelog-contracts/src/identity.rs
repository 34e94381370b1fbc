//! Caller identity and forwarded-auth header types.
//!
//! A reverse proxy in front of the application injects the authenticated end
//! user into a handful of `X-Forwarded-*` headers. `Headers` carries them for
//! one request; `Identity` is the three-field view the audit log records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel used for any identity field that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// Header carrying the end user's preferred username.
pub const PREFERRED_USERNAME_HEADER: &str = "X-Forwarded-Preferred-Username";
/// Header carrying the end user's e-mail address.
pub const EMAIL_HEADER: &str = "X-Forwarded-Email";
/// Header carrying the client address as seen by the proxy.
pub const REAL_IP_HEADER: &str = "X-Real-Ip";
/// Header carrying the proxy's opaque user identifier.
pub const FORWARDED_USER_HEADER: &str = "X-Forwarded-User";

/// Who performed an audited operation.
///
/// Fields are never absent: anything that could not be determined holds
/// [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
    /// Serialized as `ip_address` to match the audit line format.
    #[serde(rename = "ip_address")]
    pub source_ip: String,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        source_ip: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            source_ip: source_ip.into(),
        }
    }

    /// The all-`"unknown"` identity.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN)
    }

    /// Identity of a service principal: the name doubles as e-mail and the
    /// address is not known.
    pub fn from_principal(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            username: name.clone(),
            email: name,
            source_ip: UNKNOWN.to_string(),
        }
    }

    /// Replace empty fields with [`UNKNOWN`].
    pub fn normalized(mut self) -> Self {
        for field in [&mut self.username, &mut self.email, &mut self.source_ip] {
            if field.trim().is_empty() {
                *field = UNKNOWN.to_string();
            }
        }
        self
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::unknown()
    }
}

/// How an [`Identity`] was obtained.
///
/// Lets callers and tests tell a header-derived identity apart from the two
/// degraded modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// Read from forwarded-auth headers of the current request.
    HeaderDerived,
    /// No request headers; taken from the authenticated principal API.
    PrincipalDerived,
    /// Neither source was usable.
    Unknown,
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentitySource::HeaderDerived => write!(f, "headers"),
            IdentitySource::PrincipalDerived => write!(f, "principal"),
            IdentitySource::Unknown => write!(f, "unknown"),
        }
    }
}

/// An identity together with the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: Identity,
    pub source: IdentitySource,
}

impl ResolvedIdentity {
    pub fn unknown() -> Self {
        Self {
            identity: Identity::unknown(),
            source: IdentitySource::Unknown,
        }
    }
}

/// Request headers with case-insensitive lookup.
///
/// Insertion order and the original name spelling are preserved so the
/// headers can be shown back to the user verbatim. When a name repeats, the
/// first occurrence wins on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Look up a header value ignoring ASCII case in the name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
