//! Caller-side "previous response" state.
//!
//! The engine never remembers anything; this module keeps the last captured
//! body and decides whether a new capture is comparable to it.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// Identifies the service a response came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// One captured response, as read from a replay file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    #[serde(flatten)]
    pub service: ServiceKey,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Snapshot {
    service: Option<ServiceKey>,
    body: String,
}

/// The last response seen, threaded explicitly into each comparison.
#[derive(Clone, Debug, Default)]
pub struct ResponseHistory {
    last: Option<Snapshot>,
}

impl ResponseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the history with a body whose service is unknown.
    ///
    /// Such a snapshot is comparable with any service.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            last: Some(Snapshot {
                service: None,
                body: body.into(),
            }),
        }
    }

    /// The previous body to diff `current` against, if there is a usable one.
    ///
    /// A previous body is usable when it is non-empty, differs from
    /// `current`, and was captured from the same service (or from an unknown
    /// one).
    pub fn comparable_previous(&self, service: &ServiceKey, current: &str) -> Option<&str> {
        let last = self.last.as_ref()?;
        let same_service = last.service.as_ref().map_or(true, |s| s == service);
        if !same_service || last.body.is_empty() || last.body == current {
            return None;
        }
        Some(&last.body)
    }

    /// Replace the stored snapshot.
    pub fn record(&mut self, service: ServiceKey, body: impl Into<String>) {
        self.last = Some(Snapshot {
            service: Some(service),
            body: body.into(),
        });
    }

    pub fn last_service(&self) -> Option<&ServiceKey> {
        self.last.as_ref().and_then(|s| s.service.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(host: &str, port: u16) -> ServiceKey {
        ServiceKey {
            protocol: Protocol::Https,
            host: host.into(),
            port,
        }
    }

    #[test]
    fn empty_history_has_nothing() {
        let h = ResponseHistory::new();
        assert!(h.comparable_previous(&svc("a", 443), "body").is_none());
        assert!(h.last_service().is_none());
    }

    #[test]
    fn same_service_is_comparable() {
        let mut h = ResponseHistory::new();
        h.record(svc("example.com", 443), "old");
        assert_eq!(h.comparable_previous(&svc("example.com", 443), "new"), Some("old"));
    }

    #[test]
    fn different_port_host_or_protocol_is_not_comparable() {
        let mut h = ResponseHistory::new();
        h.record(svc("example.com", 443), "old");
        assert!(h.comparable_previous(&svc("example.com", 8443), "new").is_none());
        assert!(h.comparable_previous(&svc("other.com", 443), "new").is_none());

        let plain = ServiceKey {
            protocol: Protocol::Http,
            ..svc("example.com", 443)
        };
        assert!(h.comparable_previous(&plain, "new").is_none());
    }

    #[test]
    fn identical_or_empty_previous_is_skipped() {
        let mut h = ResponseHistory::new();
        h.record(svc("a", 80), "same");
        assert!(h.comparable_previous(&svc("a", 80), "same").is_none());

        h.record(svc("a", 80), "");
        assert!(h.comparable_previous(&svc("a", 80), "x").is_none());
    }

    #[test]
    fn unknown_service_matches_anything() {
        let h = ResponseHistory::with_body("seed");
        assert_eq!(h.comparable_previous(&svc("any", 1), "next"), Some("seed"));
    }

    #[test]
    fn record_replaces_snapshot() {
        let mut h = ResponseHistory::new();
        h.record(svc("a", 80), "one");
        h.record(svc("b", 81), "two");
        assert_eq!(h.last_service(), Some(&svc("b", 81)));
        assert_eq!(h.comparable_previous(&svc("b", 81), "three"), Some("two"));
    }

    #[test]
    fn capture_parses_flat_json() {
        let c: Capture = serde_json::from_str(
            r#"{"protocol":"https","host":"api.test","port":443,"body":"{}"}"#,
        )
        .unwrap();
        assert_eq!(c.service, svc("api.test", 443));
        assert_eq!(c.body, "{}");
        assert_eq!(c.service.to_string(), "https://api.test:443");
    }
}
