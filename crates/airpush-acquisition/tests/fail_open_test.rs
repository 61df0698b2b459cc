#![allow(clippy::unwrap_used)]
// Circuit-breaker and synchronous-validation behavior, tested with scripted
// transport doubles. The wiremock suites cover the happy paths; everything
// here is about calls that must NOT reach the network.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use airpush_acquisition::{
    AcquisitionClient, CircuitBreaker, ClientConfiguration, CurrentPackage, DeploymentStatus,
    Error, Method, Transport, TransportResponse, UpdateCheckResult,
};

// ── Transport doubles ───────────────────────────────────────────────

/// Returns a fixed (status, body) pair and counts invocations.
#[derive(Clone)]
struct ScriptedTransport {
    status: u16,
    body: String,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    async fn request(
        &self,
        _method: Method,
        _url: &str,
        _body: Option<String>,
    ) -> Result<TransportResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// Fails the test if any request is issued.
struct NoCallTransport;

impl Transport for NoCallTransport {
    async fn request(
        &self,
        _method: Method,
        _url: &str,
        _body: Option<String>,
    ) -> Result<TransportResponse, Error> {
        panic!("no request should have been issued");
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

const HOSTED_URL: &str = "https://codepush.appcenter.ms/";
const SELF_HOSTED_URL: &str = "https://updates.example.com/";

fn configuration(server_url: &str) -> ClientConfiguration {
    ClientConfiguration {
        server_url: server_url.to_owned(),
        app_version: "1.2.3".into(),
        client_unique_id: Some("device-42".into()),
        deployment_key: "prod-key".into(),
        ignore_app_version: false,
        package_name: None,
    }
}

fn installed_package() -> CurrentPackage {
    CurrentPackage {
        app_version: "1.2.3".into(),
        package_hash: Some("abc123".into()),
        label: Some("v7".into()),
    }
}

// ── Synchronous validation (no I/O) ─────────────────────────────────

#[tokio::test]
async fn update_check_rejects_package_without_app_version() {
    let client = AcquisitionClient::with_breaker(
        configuration(SELF_HOSTED_URL),
        NoCallTransport,
        CircuitBreaker::isolated(),
    )
    .unwrap();

    let invalid = CurrentPackage::default();
    let result = client.check_for_update(&invalid).await;

    assert!(
        matches!(result, Err(Error::Package { .. })),
        "expected Package error, got: {result:?}"
    );
}

#[tokio::test]
async fn deploy_report_rejects_package_without_status() {
    let client = AcquisitionClient::with_breaker(
        configuration(SELF_HOSTED_URL),
        NoCallTransport,
        CircuitBreaker::isolated(),
    )
    .unwrap();

    let deployed = installed_package();
    let result = client
        .report_status_deploy(Some(&deployed), None, None, None)
        .await;

    assert!(
        matches!(result, Err(Error::DeployStatus { .. })),
        "expected DeployStatus error, got: {result:?}"
    );
}

// ── Breaker trip and fail-open ──────────────────────────────────────

#[tokio::test]
async fn permanent_hosted_failure_disables_all_operations() {
    let breaker = CircuitBreaker::isolated();
    let transport = ScriptedTransport::new(404, "deployment not found");
    let client = AcquisitionClient::with_breaker(
        configuration(HOSTED_URL),
        transport.clone(),
        breaker.clone(),
    )
    .unwrap();

    // First call reaches the transport and trips the breaker.
    let first = client.check_for_update(&installed_package()).await;
    assert!(matches!(first, Err(Error::Http { status: 404, .. })));
    assert_eq!(transport.call_count(), 1);

    // Every subsequent operation fails open without touching the network.
    let skipped = AcquisitionClient::with_breaker(
        configuration(HOSTED_URL),
        NoCallTransport,
        breaker.clone(),
    )
    .unwrap();

    let check = skipped.check_for_update(&installed_package()).await.unwrap();
    assert_eq!(check, UpdateCheckResult::NoUpdate);

    skipped
        .report_status_deploy(
            Some(&installed_package()),
            Some(DeploymentStatus::Succeeded),
            None,
            None,
        )
        .await
        .unwrap();

    skipped
        .report_status_download(&installed_package())
        .await
        .unwrap();
}

#[tokio::test]
async fn tripped_breaker_does_not_affect_self_hosted_clients() {
    let breaker = CircuitBreaker::isolated();
    breaker.record_failure(HOSTED_URL, 404);
    assert!(breaker.is_tripped());

    // A client pointed at the hosted service is skipped...
    let hosted = AcquisitionClient::with_breaker(
        configuration(HOSTED_URL),
        NoCallTransport,
        breaker.clone(),
    )
    .unwrap();
    let result = hosted.check_for_update(&installed_package()).await.unwrap();
    assert_eq!(result, UpdateCheckResult::NoUpdate);

    // ...while a self-hosted client sharing the very same tripped breaker
    // keeps making real calls.
    let transport = ScriptedTransport::new(200, r#"{"update_info": {"is_available": false}}"#);
    let self_hosted = AcquisitionClient::with_breaker(
        configuration(SELF_HOSTED_URL),
        transport.clone(),
        breaker.clone(),
    )
    .unwrap();

    let result = self_hosted.check_for_update(&installed_package()).await.unwrap();
    assert_eq!(result, UpdateCheckResult::NoUpdate);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn self_hosted_failures_never_trip_the_breaker() {
    let breaker = CircuitBreaker::isolated();
    let transport = ScriptedTransport::new(404, "nope");
    let client = AcquisitionClient::with_breaker(
        configuration(SELF_HOSTED_URL),
        transport.clone(),
        breaker.clone(),
    )
    .unwrap();

    for _ in 0..3 {
        let result = client.check_for_update(&installed_package()).await;
        assert!(matches!(result, Err(Error::Http { status: 404, .. })));
    }

    assert!(!breaker.is_tripped());
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn recoverable_hosted_failures_never_trip_the_breaker() {
    let breaker = CircuitBreaker::isolated();
    let transport = ScriptedTransport::new(503, "maintenance");
    let client = AcquisitionClient::with_breaker(
        configuration(HOSTED_URL),
        transport.clone(),
        breaker.clone(),
    )
    .unwrap();

    let result = client.check_for_update(&installed_package()).await;
    assert!(matches!(result, Err(Error::Http { status: 503, .. })));
    assert!(!breaker.is_tripped());
}

#[tokio::test]
async fn status_zero_yields_connectivity_message() {
    let transport = ScriptedTransport::new(0, "");
    let client = AcquisitionClient::with_breaker(
        configuration(SELF_HOSTED_URL),
        transport,
        CircuitBreaker::isolated(),
    )
    .unwrap();

    let result = client.check_for_update(&installed_package()).await;
    match result {
        Err(Error::Http { status: 0, ref message }) => {
            assert!(
                message.contains("connectivity"),
                "expected connectivity hint, got: {message}"
            );
        }
        other => panic!("expected status-0 Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn report_failures_also_trip_the_breaker() {
    let breaker = CircuitBreaker::isolated();
    let transport = ScriptedTransport::new(403, "forbidden");
    let client = AcquisitionClient::with_breaker(
        configuration(HOSTED_URL),
        transport,
        breaker.clone(),
    )
    .unwrap();

    let result = client
        .report_status_download(&installed_package())
        .await;
    assert!(matches!(result, Err(Error::Http { status: 403, .. })));
    assert!(breaker.is_tripped());
}
