use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::beacon::RawAdvertisement;
use crate::error::ScanError;

/// The radio: a source of raw Eddystone service data over a bounded window.
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Starts scanning for the Eddystone namespace.
    ///
    /// Advertisements are delivered on the returned channel until the scan is
    /// stopped or `window` elapses, after which the channel closes.
    async fn start_scan(&self, window: Duration)
    -> Result<mpsc::Receiver<RawAdvertisement>, ScanError>;

    /// Stops the current scan. Stopping an idle source is not an error.
    async fn stop_scan(&self) -> Result<(), ScanError>;
}

/// Precondition check run before every scan start.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn check(&self) -> Result<(), ScanError>;
}
