// airpush-acquisition: Async Rust client for the airpush OTA update service.
//
// Implements the public acquisition protocol: one update-check query and two
// status-report calls (deploy + download). Downloading, installing, and
// verifying bundles are the host application's concern -- this crate only
// decides whether an update exists and reports outcomes.

pub mod breaker;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

pub use breaker::CircuitBreaker;
pub use client::AcquisitionClient;
pub use config::ClientConfiguration;
pub use error::{Error, is_recoverable};
pub use transport::{HttpTransport, Method, TlsMode, Transport, TransportConfig, TransportResponse};
pub use types::{CurrentPackage, DeploymentStatus, RemotePackage, UpdateCheckResult};
