//! Tenant subdomain derived from a host name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The canonical subdomain used for all local development hosts.
pub const LOCAL_SUBDOMAIN: &str = "localhost";

/// A tenant subdomain.
///
/// Every tenant is identified by the subdomain it is served under; all
/// tenant-scoped storage keys and API calls are partitioned by this value.
/// Local development hosts (`localhost` and IPv4 loopback addresses) all
/// normalize to the single canonical value `localhost` so a developer keeps
/// one session regardless of which loopback spelling the browser used.
///
/// ## Resolution rules
///
/// - `localhost` or a loopback address (`127` followed by up to three
///   numeric octets) resolves to `localhost`
/// - hosts with three or more labels resolve to their first label
///   (`acme.backroom.app` → `acme`)
/// - anything else resolves to the full host (`backroom.app` → `backroom.app`)
///
/// A port suffix is stripped before matching, and matching is
/// case-insensitive.
///
/// ## Examples
///
/// ```
/// use backroom_core::Subdomain;
///
/// assert_eq!(Subdomain::from_host("127.0.0.1").as_str(), "localhost");
/// assert_eq!(Subdomain::from_host("acme.backroom.app").as_str(), "acme");
/// assert_eq!(Subdomain::from_host("backroom.app").as_str(), "backroom.app");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    /// Derive the tenant subdomain from a host name.
    ///
    /// This is a total function: any input resolves to some subdomain, and
    /// unrecognized shapes fall back to the full host.
    #[must_use]
    pub fn from_host(host: &str) -> Self {
        let host = strip_port(host).to_ascii_lowercase();

        if host == LOCAL_SUBDOMAIN || is_loopback(&host) {
            return Self(LOCAL_SUBDOMAIN.to_owned());
        }

        // Only hosts with an actual subdomain label yield that label; a bare
        // domain like `backroom.app` is its own tenant alias.
        let mut labels = host.split('.');
        let first = labels.next().unwrap_or_default();
        if labels.count() >= 2 {
            return Self(first.to_owned());
        }

        Self(host)
    }

    /// Returns the subdomain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Subdomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns `true` if this is the canonical local-development subdomain.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0 == LOCAL_SUBDOMAIN
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip a `:port` suffix from a host, if present.
fn strip_port(host: &str) -> &str {
    host.split(':').next().unwrap_or(host)
}

/// Loose IPv4 loopback check: `127` followed by zero to three numeric
/// octets. Octet values are not range-checked; the whole 127.0.0.0/8 block
/// loops back, and anything else that starts with `127.` is not a host we
/// can meaningfully partition a tenant by anyway.
fn is_loopback(host: &str) -> bool {
    let mut labels = host.split('.');
    if labels.next() != Some("127") {
        return false;
    }

    let mut octets = 0;
    for label in labels {
        if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        octets += 1;
    }

    octets <= 3
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost() {
        assert_eq!(Subdomain::from_host("localhost").as_str(), "localhost");
    }

    #[test]
    fn test_loopback_addresses() {
        assert_eq!(Subdomain::from_host("127.0.0.1").as_str(), "localhost");
        assert_eq!(Subdomain::from_host("127.0.0.2").as_str(), "localhost");
        assert_eq!(Subdomain::from_host("127.1").as_str(), "localhost");
        assert_eq!(Subdomain::from_host("127").as_str(), "localhost");
    }

    #[test]
    fn test_non_loopback_addresses() {
        assert_eq!(Subdomain::from_host("128.0.0.1").as_str(), "128");
        assert_eq!(Subdomain::from_host("10.0.0.1").as_str(), "10");
    }

    #[test]
    fn test_subdomain_host() {
        assert_eq!(Subdomain::from_host("acme.backroom.app").as_str(), "acme");
        assert_eq!(
            Subdomain::from_host("shop.eu.backroom.app").as_str(),
            "shop"
        );
    }

    #[test]
    fn test_bare_domain_is_its_own_alias() {
        assert_eq!(
            Subdomain::from_host("backroom.app").as_str(),
            "backroom.app"
        );
    }

    #[test]
    fn test_port_is_stripped() {
        assert_eq!(Subdomain::from_host("localhost:3000").as_str(), "localhost");
        assert_eq!(Subdomain::from_host("127.0.0.1:8080").as_str(), "localhost");
        assert_eq!(
            Subdomain::from_host("acme.backroom.app:443").as_str(),
            "acme"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Subdomain::from_host("LOCALHOST").as_str(), "localhost");
        assert_eq!(Subdomain::from_host("Acme.Backroom.App").as_str(), "acme");
    }

    #[test]
    fn test_loopback_with_garbage_octet_falls_through() {
        // `127.evil.com` is not a loopback address; with three labels it
        // resolves like any other subdomain host.
        assert_eq!(Subdomain::from_host("127.evil.com").as_str(), "127");
    }

    #[test]
    fn test_is_local() {
        assert!(Subdomain::from_host("127.0.0.1").is_local());
        assert!(!Subdomain::from_host("acme.backroom.app").is_local());
    }

    #[test]
    fn test_serde_transparent() {
        let sub = Subdomain::from_host("acme.backroom.app");
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, "\"acme\"");
    }
}
