// Process-wide circuit breaker for the hosted update service.
//
// The flag trips exactly once per process lifetime, on the first permanent
// failure observed against the canonical managed-service host, and never
// resets without a restart. The breaker is specific to the hosted
// multi-tenant service in both directions: failures from self-hosted
// servers never trip it, and a tripped breaker never short-circuits calls
// to a self-hosted server -- only the operator of a private server can
// decide its own failure policy.
//
// Once tripped, every acquisition operation against the hosted service
// fails open -- update checks report "no update" and status reports no-op --
// so a broken acquisition service can never block usage of the host
// application.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::error::is_recoverable;

/// Domain of the hosted multi-tenant update service.
pub const CANONICAL_SERVICE_HOST: &str = "appcenter.ms";

static GLOBAL: OnceLock<CircuitBreaker> = OnceLock::new();

/// Shared handle to the process-wide "API calls disabled" flag.
///
/// Clones share the same underlying flag. The transition is monotonic
/// false→true; a lost update under a concurrent race only delays tripping by
/// one more failed call, never un-trips.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    api_calls_disabled: Arc<AtomicBool>,
}

/// Whether a configured server URL targets the hosted service.
fn targets_canonical_host(server_url: &str) -> bool {
    server_url.contains(CANONICAL_SERVICE_HOST)
}

impl CircuitBreaker {
    /// The process-wide breaker shared by every client built with
    /// [`AcquisitionClient::new`](crate::AcquisitionClient::new).
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::isolated).clone()
    }

    /// A fresh, untripped breaker. Used by tests and by embedders that want
    /// per-scope failure isolation instead of the process-wide default.
    pub fn isolated() -> Self {
        Self {
            api_calls_disabled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the flag has tripped.
    pub fn is_tripped(&self) -> bool {
        self.api_calls_disabled.load(Ordering::Relaxed)
    }

    /// Whether a call to `server_url` should be skipped entirely.
    ///
    /// True only when the breaker has tripped *and* the URL targets the
    /// hosted service; self-hosted servers are never short-circuited.
    pub fn should_skip(&self, server_url: &str) -> bool {
        self.is_tripped() && targets_canonical_host(server_url)
    }

    /// Record a non-2xx response. Trips the breaker only when the configured
    /// server URL targets the hosted service *and* the status is permanent
    /// per [`is_recoverable`].
    pub fn record_failure(&self, server_url: &str, status: u16) {
        if !targets_canonical_host(server_url) {
            debug!(status, "failure from self-hosted server; breaker untouched");
            return;
        }
        if is_recoverable(status) {
            return;
        }
        if !self.api_calls_disabled.swap(true, Ordering::Relaxed) {
            warn!(
                status,
                "permanent failure from the hosted update service; \
                 disabling acquisition calls for the rest of this process"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTED: &str = "https://codepush.appcenter.ms/";
    const SELF_HOSTED: &str = "https://updates.example.com/";

    #[test]
    fn starts_closed() {
        let breaker = CircuitBreaker::isolated();
        assert!(!breaker.is_tripped());
        assert!(!breaker.should_skip(HOSTED));
    }

    #[test]
    fn trips_on_permanent_failure_from_canonical_host() {
        let breaker = CircuitBreaker::isolated();
        breaker.record_failure(HOSTED, 404);
        assert!(breaker.is_tripped());
        assert!(breaker.should_skip(HOSTED));
    }

    #[test]
    fn tripped_breaker_never_skips_self_hosted_servers() {
        let breaker = CircuitBreaker::isolated();
        breaker.record_failure(HOSTED, 404);
        assert!(!breaker.should_skip(SELF_HOSTED));
    }

    #[test]
    fn recoverable_failures_never_trip() {
        let breaker = CircuitBreaker::isolated();
        for status in [500, 502, 503, 504, 408, 429] {
            breaker.record_failure(HOSTED, status);
            assert!(!breaker.is_tripped(), "status {status} must not trip");
        }
    }

    #[test]
    fn self_hosted_failures_never_trip() {
        let breaker = CircuitBreaker::isolated();
        breaker.record_failure(SELF_HOSTED, 404);
        breaker.record_failure(SELF_HOSTED, 401);
        assert!(!breaker.is_tripped());
    }

    #[test]
    fn trip_is_one_way() {
        let breaker = CircuitBreaker::isolated();
        breaker.record_failure(HOSTED, 404);
        // A later recoverable failure must not reset the flag.
        breaker.record_failure(HOSTED, 503);
        assert!(breaker.is_tripped());
    }

    #[test]
    fn clones_share_state() {
        let breaker = CircuitBreaker::isolated();
        let other = breaker.clone();
        breaker.record_failure(HOSTED, 403);
        assert!(other.is_tripped());
    }
}
