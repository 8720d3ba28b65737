//! Grid endpoint resolution and validation.
//!
//! A grid connection override supplied through the environment is untrusted
//! input: it may be malformed, point at an unexpected host, or try to reach a
//! privileged port. The resolver validates the override against a fixed
//! allow-list and substitutes a safe fallback on any rejection, so that
//! configuration loading never aborts because of a bad override.

use std::fmt;
use std::sync::Arc;

use url::Url;

/// Environment variable carrying the grid connection override.
pub const GRID_URL_ENV: &str = "SELENIUM_HUB_URL";

/// Hostname used when no override was supplied at all.
pub const LOCAL_HOST: &str = "localhost";

/// Safe fallback substituted when an override fails validation.
pub const FALLBACK_HOST: &str = "selenium-hub";

/// Hostnames accepted without substitution. Exact match only.
pub const ALLOWED_HOSTS: &[&str] = &["selenium-hub", "localhost", "127.0.0.1"];

/// Lowest acceptable port; anything below is in the privileged range.
const MIN_PORT: u16 = 1024;

/// Sink for resolver diagnostics, injectable so tests can capture warnings.
pub type WarnSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Why an override was rejected. All reasons map to the same fallback host;
/// the reason only shapes the diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MalformedInput,
    DisallowedProtocol,
    PortOutOfRange,
    HostnameNotAllowed,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RejectReason::MalformedInput => "override is not a valid URL",
            RejectReason::DisallowedProtocol => "only http and https are accepted",
            RejectReason::PortOutOfRange => "port is outside the unprivileged range",
            RejectReason::HostnameNotAllowed => "hostname is not in the allow-list",
        };
        f.write_str(msg)
    }
}

/// A resolved grid hostname.
///
/// `host()` is always one of [`ALLOWED_HOSTS`] or [`LOCAL_HOST`];
/// `rejection()` distinguishes a genuine validation pass from a fallback
/// that happens to spell the same hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    host: String,
    rejection: Option<RejectReason>,
}

impl ConnectionTarget {
    fn local() -> Self {
        Self {
            host: LOCAL_HOST.to_string(),
            rejection: None,
        }
    }

    fn allowed(host: &str) -> Self {
        Self {
            host: host.to_string(),
            rejection: None,
        }
    }

    fn fallback(reason: RejectReason) -> Self {
        Self {
            host: FALLBACK_HOST.to_string(),
            rejection: Some(reason),
        }
    }

    /// The hostname the automation client should connect to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The rejection that caused a fallback, if any.
    pub fn rejection(&self) -> Option<RejectReason> {
        self.rejection
    }

    pub fn is_fallback(&self) -> bool {
        self.rejection.is_some()
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Validates grid connection overrides into a safe hostname.
///
/// Stateless across calls; the only side effect is a warning per rejected
/// override, emitted through the configured sink.
pub struct EndpointResolver {
    warn: WarnSink,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointResolver {
    /// Resolver whose warnings go to the `tracing` subscriber.
    pub fn new() -> Self {
        Self {
            warn: Arc::new(|msg| tracing::warn!("{msg}")),
        }
    }

    /// Resolver with a caller-supplied warning sink.
    pub fn with_sink(warn: WarnSink) -> Self {
        Self { warn }
    }

    /// Resolves an optional override into the hostname to connect to.
    ///
    /// Checks run in fixed order (scheme, port, hostname); the first failing
    /// check wins and every failure produces the same fallback host. Never
    /// fails: a rejected or malformed override degrades to [`FALLBACK_HOST`]
    /// and an absent one means local execution.
    pub fn resolve(&self, raw: Option<&str>) -> ConnectionTarget {
        let Some(raw) = raw else {
            return ConnectionTarget::local();
        };

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(_) => return self.reject(raw, RejectReason::MalformedInput),
        };

        if !matches!(url.scheme(), "http" | "https") {
            return self.reject(raw, RejectReason::DisallowedProtocol);
        }

        // The privileged-port floor applies only to a port the caller wrote;
        // an absent port infers the scheme default (443 https / 80 http) and
        // is accepted. u16 caps the upper bound.
        if let Some(port) = url.port().or_else(|| explicit_port(raw)) {
            if port < MIN_PORT {
                return self.reject(raw, RejectReason::PortOutOfRange);
            }
        }

        match url.host_str() {
            Some(host) if ALLOWED_HOSTS.contains(&host) => ConnectionTarget::allowed(host),
            _ => self.reject(raw, RejectReason::HostnameNotAllowed),
        }
    }

    /// Resolves from [`GRID_URL_ENV`]. An empty value counts as absent.
    pub fn resolve_from_env(&self) -> ConnectionTarget {
        self.resolve(grid_override_from_env().as_deref())
    }

    fn reject(&self, raw: &str, reason: RejectReason) -> ConnectionTarget {
        (self.warn)(&format!(
            "Ignoring grid override '{raw}': {reason}; falling back to {FALLBACK_HOST}"
        ));
        ConnectionTarget::fallback(reason)
    }
}

/// Reads the grid override from the environment, treating empty as absent.
pub fn grid_override_from_env() -> Option<String> {
    std::env::var(GRID_URL_ENV).ok().filter(|v| !v.is_empty())
}

/// The port written in the raw override, if any.
///
/// `Url::port` normalizes away a port matching the scheme default
/// (`http://host:80` parses identically to `http://host`), but the floor
/// must still reject an explicit `:80`, so the authority text is checked
/// directly.
fn explicit_port(raw: &str) -> Option<u16> {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let (_, port) = host_port.rsplit_once(':')?;
    port.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn capturing_resolver() -> (EndpointResolver, Arc<Mutex<Vec<String>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let resolver = EndpointResolver::with_sink(Arc::new(move |msg: &str| {
            sink.lock().unwrap().push(msg.to_string());
        }));
        (resolver, captured)
    }

    #[test]
    fn test_absent_override_means_local() {
        let (resolver, warnings) = capturing_resolver();
        let target = resolver.resolve(None);
        assert_eq!(target.host(), "localhost");
        assert!(!target.is_fallback());
        assert!(warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let (resolver, warnings) = capturing_resolver();
        let target = resolver.resolve(Some("not a url"));
        assert_eq!(target.host(), "selenium-hub");
        assert_eq!(target.rejection(), Some(RejectReason::MalformedInput));
        assert_eq!(warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_string_is_malformed_not_absent() {
        let (resolver, _) = capturing_resolver();
        let target = resolver.resolve(Some(""));
        assert_eq!(target.host(), "selenium-hub");
        assert_eq!(target.rejection(), Some(RejectReason::MalformedInput));
    }

    #[test]
    fn test_ftp_scheme_rejected() {
        let (resolver, warnings) = capturing_resolver();
        let target = resolver.resolve(Some("ftp://selenium-hub:8080"));
        assert_eq!(target.host(), "selenium-hub");
        // Fallback, not an echo of the parsed host.
        assert_eq!(target.rejection(), Some(RejectReason::DisallowedProtocol));
        assert_eq!(warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_privileged_port_rejected() {
        let (resolver, _) = capturing_resolver();
        let target = resolver.resolve(Some("http://selenium-hub:80"));
        assert_eq!(target.host(), "selenium-hub");
        // Port 80 is below the floor, so this is a fallback even though the
        // hostname itself would have passed the allow-list.
        assert_eq!(target.rejection(), Some(RejectReason::PortOutOfRange));
    }

    #[test]
    fn test_allowed_host_and_port_pass() {
        let (resolver, warnings) = capturing_resolver();
        let target = resolver.resolve(Some("http://selenium-hub:9999"));
        assert_eq!(target.host(), "selenium-hub");
        assert!(!target.is_fallback());
        assert!(warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unlisted_host_rejected() {
        let (resolver, _) = capturing_resolver();
        let target = resolver.resolve(Some("http://evil.com:9999"));
        assert_eq!(target.host(), "selenium-hub");
        assert_eq!(target.rejection(), Some(RejectReason::HostnameNotAllowed));
    }

    #[test]
    fn test_https_default_port_inferred() {
        let (resolver, warnings) = capturing_resolver();
        let target = resolver.resolve(Some("https://localhost"));
        assert_eq!(target.host(), "localhost");
        assert!(!target.is_fallback());
        assert!(warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_absent_port_accepted_for_both_schemes() {
        let (resolver, warnings) = capturing_resolver();
        // No port written means the scheme default is inferred and accepted;
        // the floor only applies to explicit ports.
        let target = resolver.resolve(Some("http://localhost"));
        assert_eq!(target.host(), "localhost");
        assert!(!target.is_fallback());
        let target = resolver.resolve(Some("https://selenium-hub"));
        assert_eq!(target.host(), "selenium-hub");
        assert!(!target.is_fallback());
        assert!(warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn test_explicit_default_port_still_rejected() {
        let (resolver, _) = capturing_resolver();
        // The URL parser normalizes `:443` away on https, but a written
        // privileged port must be rejected all the same.
        let target = resolver.resolve(Some("https://localhost:443"));
        assert_eq!(target.host(), "selenium-hub");
        assert_eq!(target.rejection(), Some(RejectReason::PortOutOfRange));
    }

    #[test]
    fn test_loopback_ip_allowed() {
        let (resolver, _) = capturing_resolver();
        let target = resolver.resolve(Some("https://127.0.0.1:4444"));
        assert_eq!(target.host(), "127.0.0.1");
        assert!(!target.is_fallback());
    }

    #[test]
    fn test_check_order_scheme_before_port_before_host() {
        let (resolver, _) = capturing_resolver();
        // Bad scheme, bad port and bad host at once: scheme wins.
        let target = resolver.resolve(Some("ftp://evil.com:80"));
        assert_eq!(target.rejection(), Some(RejectReason::DisallowedProtocol));
        // Bad port and bad host: port wins.
        let target = resolver.resolve(Some("http://evil.com:80"));
        assert_eq!(target.rejection(), Some(RejectReason::PortOutOfRange));
    }

    #[test]
    fn test_idempotent() {
        let (resolver, warnings) = capturing_resolver();
        let first = resolver.resolve(Some("http://selenium-hub:9999"));
        let second = resolver.resolve(Some("http://selenium-hub:9999"));
        assert_eq!(first, second);
        assert!(warnings.lock().unwrap().is_empty());

        let first = resolver.resolve(Some("http://evil.com:9999"));
        let second = resolver.resolve(Some("http://evil.com:9999"));
        assert_eq!(first, second);
        assert_eq!(warnings.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_every_rejection_warns_exactly_once() {
        for raw in ["::nope::", "ftp://selenium-hub:8080", "http://selenium-hub:80", "http://evil.com:9999"] {
            let (resolver, warnings) = capturing_resolver();
            let target = resolver.resolve(Some(raw));
            assert!(target.is_fallback(), "{raw} should fall back");
            assert_eq!(warnings.lock().unwrap().len(), 1, "{raw} should warn once");
        }
    }

    #[test]
    fn test_display_is_bare_host() {
        let (resolver, _) = capturing_resolver();
        let target = resolver.resolve(Some("https://localhost:8443"));
        assert_eq!(target.to_string(), "localhost");
    }
}
