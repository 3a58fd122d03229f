// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection lifecycle and raw byte transport for one device.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::command::{Command, WakeCommand};
use crate::error::{Error, ProtocolError};
use crate::protocol::{
    Characteristics, DisconnectHandler, LinkClient, LinkEstablisher, NotificationHandler,
    RetryPolicy,
};

/// Owns the link to a single grill controller.
///
/// The transport moves raw bytes in both directions: [`send`](Self::send)
/// writes frames to the write characteristic, and every payload arriving on
/// the notify characteristic is forwarded to the handler registered with
/// [`subscribe`](Self::subscribe).
///
/// Handlers run synchronously in the link's delivery path, so a handler that
/// blocks delays delivery of the next payload.
pub struct Transport<E: LinkEstablisher> {
    establisher: E,
    address: String,
    characteristics: Characteristics,
    retry_policy: RetryPolicy,
    client: Mutex<Option<E::Client>>,
    handler: Arc<RwLock<Option<NotificationHandler>>>,
    disconnect_hook: Arc<RwLock<Option<DisconnectHandler>>>,
    /// Bumped on every connect and disconnect so stale links stay silent.
    generation: Arc<AtomicU64>,
}

impl<E: LinkEstablisher> Transport<E> {
    /// Creates a disconnected transport for the device at `address`.
    pub fn new(
        establisher: E,
        address: impl Into<String>,
        characteristics: Characteristics,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            establisher,
            address: address.into(),
            characteristics,
            retry_policy,
            client: Mutex::new(None),
            handler: Arc::new(RwLock::new(None)),
            disconnect_hook: Arc::new(RwLock::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the characteristics in use.
    #[must_use]
    pub fn characteristics(&self) -> Characteristics {
        self.characteristics
    }

    /// Registers the notification handler, replacing any previous one.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        *self.handler.write() = Some(Arc::new(handler));
    }

    /// Registers a hook called when the link drops without
    /// [`disconnect`](Self::disconnect) being called.
    pub fn on_link_lost<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.disconnect_hook.write() = Some(Arc::new(hook));
    }

    /// Establishes the link, enables notifications and wakes the controller.
    ///
    /// Does nothing if the link is already up.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::ConnectionFailed` once the retry policy is
    /// exhausted, or the link error if notifications cannot be enabled.
    pub async fn connect(&self) -> Result<(), Error> {
        let mut client = self.client.lock().await;

        if let Some(existing) = client.as_ref() {
            if existing.is_connected().await {
                tracing::debug!(address = %self.address, "Already connected");
                return Ok(());
            }
            if let Err(err) = existing.disconnect().await {
                tracing::debug!(address = %self.address, error = %err, "Failed to drop stale link");
            }
            *client = None;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(address = %self.address, "Connecting");

        let link = self.establish_with_retry(generation).await?;

        let forward = self.notification_forwarder(generation);
        if let Err(err) = link
            .enable_notifications(self.characteristics.notify(), forward)
            .await
        {
            tracing::error!(address = %self.address, error = %err, "Failed to enable notifications");
            if let Err(err) = link.disconnect().await {
                tracing::debug!(address = %self.address, error = %err, "Failed to drop link");
            }
            return Err(err.into());
        }

        let wake = WakeCommand;
        match link
            .write(self.characteristics.write(), &wake.to_bytes(), false)
            .await
        {
            Ok(()) => tracing::debug!(frame = %wake.to_hex(), "Sent wake frame"),
            Err(err) => tracing::warn!(address = %self.address, error = %err, "Wake frame not delivered"),
        }

        *client = Some(link);
        tracing::info!(address = %self.address, "Connected to grill");
        Ok(())
    }

    /// Tears down the link if connected.
    ///
    /// Safe to call when already disconnected. The local client handle is
    /// always cleared.
    pub async fn disconnect(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let Some(link) = self.client.lock().await.take() else {
            tracing::debug!(address = %self.address, "Disconnect requested while not connected");
            return;
        };

        if let Err(err) = link.disconnect().await {
            tracing::warn!(address = %self.address, error = %err, "Link reported error on disconnect");
        }
        tracing::info!(address = %self.address, "Disconnected from grill");
    }

    /// Returns `true` while the link is up.
    pub async fn is_connected(&self) -> bool {
        match self.client.lock().await.as_ref() {
            Some(link) => link.is_connected().await,
            None => false,
        }
    }

    /// Writes raw bytes to the write characteristic without waiting for a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` if the link is down, or the link error
    /// if the write fails.
    pub async fn send(&self, data: &[u8]) -> Result<(), Error> {
        let client = self.client.lock().await;

        let Some(link) = client.as_ref() else {
            tracing::error!(address = %self.address, "Not connected, cannot send frame");
            return Err(Error::NotConnected);
        };
        if !link.is_connected().await {
            tracing::error!(address = %self.address, "Link is down, cannot send frame");
            return Err(Error::NotConnected);
        }

        tracing::debug!(frame = %hex::encode(data), "Sending frame");
        link.write(self.characteristics.write(), data, false)
            .await
            .map_err(Error::Protocol)
    }

    /// Sends a command frame.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_command<C: Command + Sync>(&self, command: &C) -> Result<(), Error> {
        tracing::debug!(command = command.name(), "Sending command");
        self.send(&command.to_bytes()).await
    }

    async fn establish_with_retry(&self, generation: u64) -> Result<E::Client, ProtocolError> {
        let mut attempt = 1;
        loop {
            let on_disconnect = self.disconnect_forwarder(generation);
            match self.establisher.establish(&self.address, on_disconnect).await {
                Ok(link) => return Ok(link),
                Err(err) if self.retry_policy.should_retry(attempt) => {
                    let delay = self.retry_policy.delay_after_attempt(attempt);
                    tracing::warn!(
                        address = %self.address,
                        attempt,
                        error = %err,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Connection attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(address = %self.address, attempt, error = %err, "Connection failed");
                    return Err(ProtocolError::ConnectionFailed {
                        attempts: attempt,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    fn notification_forwarder(&self, generation: u64) -> NotificationHandler {
        let current = Arc::clone(&self.generation);
        let slot = Arc::clone(&self.handler);
        Arc::new(move |data: &[u8]| {
            if current.load(Ordering::SeqCst) != generation {
                tracing::trace!(frame = %hex::encode(data), "Dropping notification from a previous link");
                return;
            }
            let handler = slot.read().clone();
            if let Some(handler) = handler {
                handler(data);
            }
        })
    }

    fn disconnect_forwarder(&self, generation: u64) -> DisconnectHandler {
        let address = self.address.clone();
        let current = Arc::clone(&self.generation);
        let hook = Arc::clone(&self.disconnect_hook);
        Arc::new(move || {
            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(address = %address, "Ignoring disconnect from a previous link");
                return;
            }
            tracing::warn!(address = %address, "Grill link lost");
            let hook = hook.read().clone();
            if let Some(hook) = hook {
                hook();
            }
        })
    }
}

impl<E: LinkEstablisher> std::fmt::Debug for Transport<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("address", &self.address)
            .field("characteristics", &self.characteristics)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32};
    use uuid::Uuid;

    #[derive(Default)]
    struct LinkLog {
        writes: parking_lot::Mutex<Vec<(Uuid, Vec<u8>, bool)>>,
        handler: parking_lot::Mutex<Option<NotificationHandler>>,
        on_disconnect: parking_lot::Mutex<Option<DisconnectHandler>>,
        connected: AtomicBool,
        disconnects: AtomicU32,
        fail_wake: AtomicBool,
    }

    struct MockEstablisher {
        log: Arc<LinkLog>,
        failures_before_success: AtomicU32,
        attempts: AtomicU32,
    }

    impl MockEstablisher {
        fn new(failures: u32) -> (Self, Arc<LinkLog>) {
            let log = Arc::new(LinkLog::default());
            let establisher = Self {
                log: Arc::clone(&log),
                failures_before_success: AtomicU32::new(failures),
                attempts: AtomicU32::new(0),
            };
            (establisher, log)
        }
    }

    struct MockClient {
        log: Arc<LinkLog>,
    }

    impl LinkEstablisher for MockEstablisher {
        type Client = MockClient;

        async fn establish(
            &self,
            _address: &str,
            on_disconnect: DisconnectHandler,
        ) -> Result<MockClient, ProtocolError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_before_success.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_before_success
                    .store(remaining - 1, Ordering::SeqCst);
                return Err(ProtocolError::Link("radio busy".to_string()));
            }
            self.log.connected.store(true, Ordering::SeqCst);
            *self.log.on_disconnect.lock() = Some(on_disconnect);
            Ok(MockClient {
                log: Arc::clone(&self.log),
            })
        }
    }

    impl LinkClient for MockClient {
        async fn enable_notifications(
            &self,
            _characteristic: Uuid,
            handler: NotificationHandler,
        ) -> Result<(), ProtocolError> {
            *self.log.handler.lock() = Some(handler);
            Ok(())
        }

        async fn write(
            &self,
            characteristic: Uuid,
            data: &[u8],
            with_response: bool,
        ) -> Result<(), ProtocolError> {
            if self.log.fail_wake.load(Ordering::SeqCst) && data == WakeCommand.to_bytes().as_slice() {
                return Err(ProtocolError::Link("write rejected".to_string()));
            }
            self.log
                .writes
                .lock()
                .push((characteristic, data.to_vec(), with_response));
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), ProtocolError> {
            self.log.connected.store(false, Ordering::SeqCst);
            self.log.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            self.log.connected.load(Ordering::SeqCst)
        }
    }

    fn transport(establisher: MockEstablisher) -> Transport<MockEstablisher> {
        Transport::new(
            establisher,
            "AA:BB:CC:DD:EE:FF",
            Characteristics::default(),
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn connect_sends_wake_frame() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);

        transport.connect().await.unwrap();

        assert!(transport.is_connected().await);
        let writes = log.writes.lock();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, Characteristics::DEFAULT_WRITE);
        assert_eq!(writes[0].1, [0xFA, 0x06, 0xFE, 0x0B, 0x01, 0xFF]);
        assert!(!writes[0].2);
    }

    #[tokio::test]
    async fn wake_failure_is_not_fatal() {
        let (establisher, log) = MockEstablisher::new(0);
        log.fail_wake.store(true, Ordering::SeqCst);
        let transport = transport(establisher);

        assert!(transport.connect().await.is_ok());
        assert!(transport.is_connected().await);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_retries_transient_failures() {
        let (establisher, _log) = MockEstablisher::new(2);
        let transport = transport(establisher);

        transport.connect().await.unwrap();

        assert_eq!(transport.establisher.attempts.load(Ordering::SeqCst), 3);
        assert!(transport.is_connected().await);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_fails_after_exhausting_retries() {
        let (establisher, _log) = MockEstablisher::new(10);
        let transport = transport(establisher);

        let err = transport.connect().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ConnectionFailed { attempts: 3, .. })
        ));
        assert!(!transport.is_connected().await);
    }

    #[tokio::test]
    async fn send_requires_connection() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);

        let err = transport.send(&[0x01]).await.unwrap_err();

        assert!(matches!(err, Error::NotConnected));
        assert!(log.writes.lock().is_empty());
    }

    #[tokio::test]
    async fn send_writes_exact_bytes() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);
        transport.connect().await.unwrap();

        transport.send(&[0xDE, 0xAD]).await.unwrap();

        let writes = log.writes.lock();
        assert_eq!(writes.last().unwrap().1, [0xDE, 0xAD]);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);

        transport.disconnect().await;
        transport.connect().await.unwrap();
        transport.disconnect().await;
        transport.disconnect().await;

        assert_eq!(log.disconnects.load(Ordering::SeqCst), 1);
        assert!(!transport.is_connected().await);
        assert!(matches!(
            transport.send(&[0x01]).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn notifications_reach_latest_handler() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&first);
        transport.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        transport.connect().await.unwrap();

        let deliver = log.handler.lock().clone().unwrap();
        deliver(&[0xFA]);

        let counter = Arc::clone(&second);
        transport.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        deliver(&[0xFA]);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn notifications_from_previous_link_are_dropped() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);
        let received = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&received);
        transport.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        transport.connect().await.unwrap();
        let stale = log.handler.lock().clone().unwrap();
        transport.disconnect().await;
        stale(&[0xFA]);
        assert_eq!(received.load(Ordering::SeqCst), 0);

        // A new link delivers, the old one stays silent
        transport.connect().await.unwrap();
        let fresh = log.handler.lock().clone().unwrap();
        stale(&[0xFA]);
        fresh(&[0xFA]);
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn link_lost_hook_fires_only_for_current_link() {
        let (establisher, log) = MockEstablisher::new(0);
        let transport = transport(establisher);
        let lost = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&lost);
        transport.on_link_lost(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        transport.connect().await.unwrap();
        let on_disconnect = log.on_disconnect.lock().clone().unwrap();
        on_disconnect();
        assert_eq!(lost.load(Ordering::SeqCst), 1);

        // After an explicit disconnect the old link's hook is ignored
        transport.disconnect().await;
        on_disconnect();
        assert_eq!(lost.load(Ordering::SeqCst), 1);
    }
}
