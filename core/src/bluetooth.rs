//! A [`ScanSource`] over the host Bluetooth LE adapter, via `btleplug`.
//!
//! Only service data published under the Eddystone namespace is forwarded.
//! Service data arrives either inline with an advertisement event or, on
//! backends that only report discovery, through the peripheral's properties.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, PeripheralId};
use futures::StreamExt;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use eddyweb_common::{
    beacon::RawAdvertisement,
    error::{Permission, ScanError},
    scanning::{PermissionGate, ScanSource},
};
use eddyweb_protocols::EDDYSTONE_SERVICE_UUID;

const ADVERTISEMENT_BUFFER: usize = 256;

pub struct BluetoothScanner {
    manager: Manager,
    active: Mutex<Option<ActiveScan>>,
}

struct ActiveScan {
    adapter: Adapter,
    forwarder: JoinHandle<()>,
}

impl BluetoothScanner {
    pub async fn new() -> Result<Self, ScanError> {
        let manager = Manager::new().await.map_err(backend_error)?;
        Ok(Self {
            manager,
            active: Mutex::new(None),
        })
    }

    async fn first_adapter(&self) -> Result<Adapter, ScanError> {
        self.manager
            .adapters()
            .await
            .map_err(backend_error)?
            .into_iter()
            .next()
            .ok_or(ScanError::NoAdapter)
    }
}

#[async_trait]
impl ScanSource for BluetoothScanner {
    async fn start_scan(
        &self,
        window: Duration,
    ) -> Result<mpsc::Receiver<RawAdvertisement>, ScanError> {
        self.stop_scan().await?;

        let adapter: Adapter = self.first_adapter().await?;
        let events = adapter.events().await.map_err(backend_error)?;
        adapter
            .start_scan(ScanFilter {
                services: vec![EDDYSTONE_SERVICE_UUID],
            })
            .await
            .map_err(backend_error)?;
        info!("bluetooth scan started for {:.1}s", window.as_secs_f64());

        let (tx, rx) = mpsc::channel(ADVERTISEMENT_BUFFER);
        let forwarder = tokio::spawn(forward_events(adapter.clone(), events, tx, window));

        *self.active.lock().await = Some(ActiveScan { adapter, forwarder });
        Ok(rx)
    }

    async fn stop_scan(&self) -> Result<(), ScanError> {
        let Some(active) = self.active.lock().await.take() else {
            return Ok(());
        };
        active.forwarder.abort();
        active.adapter.stop_scan().await.map_err(backend_error)?;
        info!("bluetooth scan stopped");
        Ok(())
    }
}

/// Desktop stacks have no location grant; access to the adapter decides the
/// two bluetooth permissions.
#[async_trait]
impl PermissionGate for BluetoothScanner {
    async fn check(&self) -> Result<(), ScanError> {
        let adapter: Adapter = self.first_adapter().await?;
        let name: String = adapter.adapter_info().await.map_err(backend_error)?;
        debug!("using bluetooth adapter {name}");
        Ok(())
    }
}

async fn forward_events(
    adapter: Adapter,
    mut events: std::pin::Pin<Box<dyn futures::Stream<Item = CentralEvent> + Send>>,
    tx: mpsc::Sender<RawAdvertisement>,
    window: Duration,
) {
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);

    loop {
        let service_data: Option<Vec<u8>> = tokio::select! {
            event = events.next() => match event {
                Some(CentralEvent::ServiceDataAdvertisement { service_data, .. }) => {
                    service_data.get(&EDDYSTONE_SERVICE_UUID).cloned()
                }
                Some(CentralEvent::DeviceDiscovered(id)) | Some(CentralEvent::DeviceUpdated(id)) => {
                    properties_service_data(&adapter, &id).await
                }
                Some(_) => None,
                None => break,
            },
            _ = &mut deadline => break,
        };

        if let Some(bytes) = service_data {
            trace!("eddystone service data: {bytes:02X?}");
            if tx.send(RawAdvertisement::new(bytes)).await.is_err() {
                break;
            }
        }
    }
}

async fn properties_service_data(adapter: &Adapter, id: &PeripheralId) -> Option<Vec<u8>> {
    let peripheral = adapter.peripheral(id).await.ok()?;
    let properties = peripheral.properties().await.ok()??;
    properties.service_data.get(&EDDYSTONE_SERVICE_UUID).cloned()
}

fn backend_error(e: btleplug::Error) -> ScanError {
    match e {
        btleplug::Error::PermissionDenied => {
            ScanError::PermissionDenied(vec![Permission::BluetoothScan, Permission::BluetoothConnect])
        }
        other => ScanError::Backend(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_map_to_denial() {
        let err = backend_error(btleplug::Error::PermissionDenied);
        assert!(matches!(
            err,
            ScanError::PermissionDenied(missing)
                if missing == vec![Permission::BluetoothScan, Permission::BluetoothConnect]
        ));
    }

    #[test]
    fn other_errors_are_backend_errors() {
        let err = backend_error(btleplug::Error::NotConnected);
        assert!(matches!(err, ScanError::Backend(_)));
    }

    #[tokio::test]
    #[ignore]
    async fn scans_real_adapter() {
        let scanner = BluetoothScanner::new().await.unwrap();
        scanner.check().await.unwrap();
        let mut rx = scanner.start_scan(Duration::from_secs(2)).await.unwrap();
        while let Some(advertisement) = rx.recv().await {
            println!("{:02X?}", advertisement.service_data);
        }
        scanner.stop_scan().await.unwrap();
    }
}
