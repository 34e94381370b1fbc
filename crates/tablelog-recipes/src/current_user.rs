//! The "current user" page: forwarded identity headers shown back verbatim.

use tablelog_contracts::identity::{
    Headers, EMAIL_HEADER, FORWARDED_USER_HEADER, PREFERRED_USERNAME_HEADER, REAL_IP_HEADER,
};

/// Placeholder for a header the request did not carry.
pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub email: String,
    pub username: String,
    /// The proxy's opaque user id (`X-Forwarded-User`).
    pub user: String,
    pub ip: String,
    /// Every request header as `name: value`, one per line, in request order.
    pub all_headers: String,
}

pub fn user_details(headers: &Headers) -> UserDetails {
    let field = |name: &str| headers.get(name).unwrap_or(NOT_AVAILABLE).to_string();

    UserDetails {
        email: field(EMAIL_HEADER),
        username: field(PREFERRED_USERNAME_HEADER),
        user: field(FORWARDED_USER_HEADER),
        ip: field(REAL_IP_HEADER),
        all_headers: headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        let headers: Headers = [
            ("Host", "app.example.com"),
            ("X-Forwarded-Email", "dana@example.com"),
            ("X-Forwarded-Preferred-Username", "dana"),
            ("X-Forwarded-User", "4821@9911"),
            ("X-Real-Ip", "192.0.2.10"),
        ]
        .into_iter()
        .collect();

        let details = user_details(&headers);

        assert_eq!(details.email, "dana@example.com");
        assert_eq!(details.username, "dana");
        assert_eq!(details.user, "4821@9911");
        assert_eq!(details.ip, "192.0.2.10");
        assert_eq!(
            details.all_headers,
            "Host: app.example.com\nX-Forwarded-Email: dana@example.com\n\
             X-Forwarded-Preferred-Username: dana\nX-Forwarded-User: 4821@9911\n\
             X-Real-Ip: 192.0.2.10"
        );
    }

    #[test]
    fn test_missing_headers_are_not_available() {
        let details = user_details(&Headers::new());
        assert_eq!(details.email, NOT_AVAILABLE);
        assert_eq!(details.user, NOT_AVAILABLE);
        assert_eq!(details.all_headers, "");
    }
}
