// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BLE link implementation backed by btleplug.

use std::time::Duration;

use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::ProtocolError;
use crate::protocol::{DisconnectHandler, LinkClient, LinkEstablisher, NotificationHandler};

/// Establishes links through the first available Bluetooth adapter.
///
/// The device is located by scanning for a peripheral whose address (or
/// platform identifier, on systems that hide addresses) matches the one
/// given to [`establish`](LinkEstablisher::establish).
///
/// # Examples
///
/// ```no_run
/// use grillmor_lib::Grill;
/// use grillmor_lib::protocol::BtleplugEstablisher;
///
/// # async fn example() -> grillmor_lib::Result<()> {
/// let grill = Grill::builder(BtleplugEstablisher::new(), "AA:BB:CC:DD:EE:FF").build();
/// grill.start().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BtleplugEstablisher {
    scan_timeout: Duration,
}

impl BtleplugEstablisher {
    /// Default time spent scanning for the device on each attempt.
    pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

    const SCAN_POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// Creates an establisher with the default scan timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scan_timeout: Self::DEFAULT_SCAN_TIMEOUT,
        }
    }

    /// Sets how long each attempt scans for the device.
    #[must_use]
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    async fn adapter() -> Result<Adapter, ProtocolError> {
        let manager = Manager::new().await?;
        manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProtocolError::Link("no Bluetooth adapter available".to_string()))
    }

    async fn find_peripheral(
        &self,
        adapter: &Adapter,
        address: &str,
    ) -> Result<Peripheral, ProtocolError> {
        adapter.start_scan(ScanFilter::default()).await?;

        let found = tokio::time::timeout(self.scan_timeout, async {
            loop {
                for peripheral in adapter.peripherals().await? {
                    if peripheral
                        .address()
                        .to_string()
                        .eq_ignore_ascii_case(address)
                        || peripheral.id().to_string().eq_ignore_ascii_case(address)
                    {
                        return Ok::<_, ProtocolError>(peripheral);
                    }
                }
                tokio::time::sleep(Self::SCAN_POLL_INTERVAL).await;
            }
        })
        .await;

        if let Err(err) = adapter.stop_scan().await {
            tracing::debug!(error = %err, "Failed to stop scan");
        }

        found.map_err(|_| ProtocolError::DeviceNotFound(address.to_string()))?
    }

    /// Tears down a half-established connection.
    async fn abandon(peripheral: &Peripheral, address: &str) {
        if let Err(err) = peripheral.disconnect().await {
            tracing::debug!(address, error = %err, "Failed to drop half-open link");
        }
    }
}

impl Default for BtleplugEstablisher {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkEstablisher for BtleplugEstablisher {
    type Client = BtleplugClient;

    async fn establish(
        &self,
        address: &str,
        on_disconnect: DisconnectHandler,
    ) -> Result<BtleplugClient, ProtocolError> {
        let adapter = Self::adapter().await?;
        let peripheral = self.find_peripheral(&adapter, address).await?;

        // Subscribe before connecting so a drop during discovery is seen
        let mut events = adapter.events().await?;

        tracing::debug!(address, "Peripheral found, connecting");
        let connected = async {
            peripheral.connect().await?;
            peripheral.discover_services().await
        }
        .await;
        if let Err(err) = connected {
            Self::abandon(&peripheral, address).await;
            return Err(err.into());
        }

        let id = peripheral.id();
        let watcher = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let CentralEvent::DeviceDisconnected(gone) = event
                    && gone == id
                {
                    on_disconnect();
                    break;
                }
            }
        });

        Ok(BtleplugClient {
            peripheral,
            tasks: Mutex::new(vec![watcher]),
        })
    }
}

/// A connected btleplug peripheral.
#[derive(Debug)]
pub struct BtleplugClient {
    peripheral: Peripheral,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BtleplugClient {
    fn characteristic(&self, uuid: Uuid) -> Result<Characteristic, ProtocolError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid)
            .ok_or(ProtocolError::CharacteristicNotFound(uuid))
    }

    fn abort_tasks(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl LinkClient for BtleplugClient {
    async fn enable_notifications(
        &self,
        characteristic: Uuid,
        handler: NotificationHandler,
    ) -> Result<(), ProtocolError> {
        let notify = self.characteristic(characteristic)?;
        let mut notifications = self.peripheral.notifications().await?;
        self.peripheral.subscribe(&notify).await?;

        let pump = tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                if notification.uuid == characteristic {
                    handler(&notification.value);
                }
            }
        });
        self.tasks.lock().push(pump);
        Ok(())
    }

    async fn write(
        &self,
        characteristic: Uuid,
        data: &[u8],
        with_response: bool,
    ) -> Result<(), ProtocolError> {
        let target = self.characteristic(characteristic)?;
        let write_type = if with_response {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };
        self.peripheral.write(&target, data, write_type).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ProtocolError> {
        self.abort_tasks();
        self.peripheral.disconnect().await?;
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }
}

impl Drop for BtleplugClient {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
