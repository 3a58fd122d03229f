// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level session abstraction for a grill controller.
//!
//! A [`Grill`] owns one [`Transport`], the accumulated [`DeviceState`], at
//! most one observer, and the readiness gate used by [`Grill::start`].
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected -> Connecting -> AwaitingFirstSample -> Ready
//!       ^______________________________|_______________|
//!                  stop() or link lost
//! ```
//!
//! There is no automatic reconnect: after the link drops, call
//! [`Grill::start`] again.
//!
//! # Examples
//!
//! ```ignore
//! use grillmor_lib::{Grill, Readiness};
//!
//! let grill = Grill::builder(establisher, "AA:BB:CC:DD:EE:FF").build();
//!
//! grill.register_observer(|state| println!("{:?}", state.to_map()));
//!
//! if grill.start().await? == Readiness::TimedOut {
//!     println!("connected, but the grill has not reported yet");
//! }
//!
//! grill.set_temperature(225).await?;
//! grill.stop().await;
//! ```

mod builder;
mod config;

pub use builder::GrillBuilder;
pub use config::GrillConfig;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::command::{Command, SetTemperatureCommand};
use crate::error::Error;
use crate::protocol::{LinkEstablisher, Transport};
use crate::state::{DeviceState, StateChange};
use crate::subscription::ObserverSlot;
use crate::telemetry::parse_status;

/// Connection phase of a grill session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No link.
    Disconnected,
    /// `start()` is establishing the link.
    Connecting,
    /// Link up, no status frame decoded yet.
    AwaitingFirstSample,
    /// Link up and at least one status frame decoded.
    Ready,
}

impl SessionState {
    /// Returns `true` if the link is up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::AwaitingFirstSample | Self::Ready)
    }
}

/// Outcome of [`Grill::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readiness {
    /// A status frame arrived within the readiness timeout.
    Ready,
    /// Connected, but the grill stayed silent for the whole timeout.
    TimedOut,
    /// The session was stopped or the link dropped while waiting.
    Disconnected,
}

/// State shared between the session and the notification path.
struct Session {
    address: String,
    state: RwLock<DeviceState>,
    observers: ObserverSlot,
    phase: watch::Sender<SessionState>,
}

impl Session {
    fn new(address: String) -> Self {
        let (phase, _) = watch::channel(SessionState::Disconnected);
        Self {
            address,
            state: RwLock::new(DeviceState::new()),
            observers: ObserverSlot::new(),
            phase,
        }
    }

    fn set_phase(&self, next: SessionState) {
        self.phase.send_if_modified(|phase| {
            if *phase == next {
                false
            } else {
                tracing::debug!(address = %self.address, from = ?*phase, to = ?next, "Session state changed");
                *phase = next;
                true
            }
        });
    }

    /// Moves `Connecting` to `AwaitingFirstSample` unless a frame already
    /// made the session ready.
    fn mark_connected(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == SessionState::Connecting {
                *phase = SessionState::AwaitingFirstSample;
                true
            } else {
                false
            }
        });
    }

    /// Returns `true` if this call made the session ready.
    fn mark_ready(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if matches!(
                *phase,
                SessionState::Connecting | SessionState::AwaitingFirstSample
            ) {
                *phase = SessionState::Ready;
                true
            } else {
                false
            }
        })
    }

    fn handle_notification(&self, data: &[u8]) {
        let status = match parse_status(data) {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(frame = %hex::encode(data), error = %err, "Ignoring notification");
                return;
            }
        };

        let snapshot = {
            let mut state = self.state.write();
            state.apply(&status.to_state_change());
            state.clone()
        };

        tracing::trace!(
            actual_temperature_f = status.actual_temperature_f(),
            set_temperature_f = status.set_temperature_f(),
            "Status frame decoded"
        );

        if self.mark_ready() {
            tracing::debug!(address = %self.address, "First status frame received");
        }

        self.observers.dispatch(&snapshot);
    }

    fn link_lost(&self) {
        self.set_phase(SessionState::Disconnected);
        self.observers.dispatch_disconnected();
    }
}

/// A session with one grill controller.
///
/// # Concurrency
///
/// Status frames are decoded on the link's notification path while commands
/// are issued by the caller; both go through a single lock around the
/// device state. The registered observer is invoked on the notification path
/// after that lock is released, so a slow observer delays the next frame but
/// never blocks [`state`](Self::state).
pub struct Grill<E: LinkEstablisher> {
    transport: Transport<E>,
    session: Arc<Session>,
    readiness_timeout: Duration,
}

impl<E: LinkEstablisher> Grill<E> {
    /// Creates a builder for the device at `address`.
    ///
    /// # Arguments
    ///
    /// * `establisher` - The link layer used to reach the device
    /// * `address` - The device address or platform identifier
    #[must_use]
    pub fn builder(establisher: E, address: impl Into<String>) -> GrillBuilder<E> {
        GrillBuilder::new(establisher, address)
    }

    pub(crate) fn new(establisher: E, address: String, config: GrillConfig) -> Self {
        let session = Arc::new(Session::new(address.clone()));
        let transport = Transport::new(
            establisher,
            address,
            config.characteristics(),
            config.retry_policy().clone(),
        );

        let notified = Arc::clone(&session);
        transport.subscribe(move |data| notified.handle_notification(data));

        let lost = Arc::clone(&session);
        transport.on_link_lost(move || lost.link_lost());

        Self {
            transport,
            session,
            readiness_timeout: config.readiness_timeout(),
        }
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.session.address
    }

    /// Connects to the grill and waits for its first status frame.
    ///
    /// Waiting is bounded by the readiness timeout. A silent grill is not an
    /// error: the outcome is reported as [`Readiness::TimedOut`] and the
    /// session stays connected.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::ConnectionFailed` if the link cannot be
    /// established. The session is left disconnected and `start()` may be
    /// called again.
    pub async fn start(&self) -> Result<Readiness, Error> {
        self.session.set_phase(SessionState::Connecting);

        if let Err(err) = self.transport.connect().await {
            self.session.set_phase(SessionState::Disconnected);
            return Err(err);
        }
        self.session.mark_connected();

        let mut phase = self.session.phase.subscribe();
        let waited = tokio::time::timeout(
            self.readiness_timeout,
            phase.wait_for(|p| matches!(p, SessionState::Ready | SessionState::Disconnected)),
        )
        .await
        .map(|result| result.map(|p| *p));

        let readiness = match waited {
            Ok(Ok(SessionState::Ready)) => {
                tracing::info!(address = %self.address(), "Grill is reporting status");
                Readiness::Ready
            }
            Ok(_) => {
                tracing::warn!(address = %self.address(), "Session ended while waiting for status");
                Readiness::Disconnected
            }
            Err(_) => {
                tracing::warn!(
                    address = %self.address(),
                    timeout_s = self.readiness_timeout.as_secs(),
                    "No status received from grill within timeout"
                );
                Readiness::TimedOut
            }
        };
        Ok(readiness)
    }

    /// Disconnects from the grill.
    ///
    /// The last known state stays readable.
    pub async fn stop(&self) {
        self.transport.disconnect().await;
        self.session.set_phase(SessionState::Disconnected);
    }

    /// Sets the target temperature in °F.
    ///
    /// Temperatures of 500°F and above select high-power mode; 180°F to
    /// 499°F select the dial position `floor((T - 180) / 5)`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::BelowMinimum` for temperatures under 180°F
    /// (nothing is sent), `Error::NotConnected` if the link is down, or the
    /// link error if the write fails.
    pub async fn set_temperature(&self, fahrenheit: i32) -> Result<(), Error> {
        let command = SetTemperatureCommand::from_fahrenheit(fahrenheit).inspect_err(|err| {
            tracing::warn!(fahrenheit, error = %err, "Rejected temperature request");
        })?;

        tracing::info!(
            fahrenheit,
            target = %command.target(),
            frame = %command.to_hex(),
            "Setting temperature"
        );
        self.transport.send_command(&command).await?;

        self.session
            .state
            .write()
            .apply(&StateChange::RequestedTemperature(fahrenheit));
        Ok(())
    }

    /// Registers the state observer, replacing any previous one.
    ///
    /// The observer receives the full accumulated state after every decoded
    /// status frame, including repeats of an unchanged frame.
    pub fn register_observer<F>(&self, observer: F)
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        if self.session.observers.set_observer(observer) {
            tracing::debug!(address = %self.address(), "Replaced state observer");
        }
    }

    /// Removes the state observer.
    ///
    /// Returns `true` if one was registered.
    pub fn clear_observer(&self) -> bool {
        self.session.observers.clear_observer()
    }

    /// Registers a callback for unexpected link loss.
    ///
    /// Not called for [`stop`](Self::stop).
    pub fn on_disconnected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.session.observers.set_disconnected(callback);
    }

    /// Returns a snapshot of the last known device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.session.state.read().clone()
    }

    /// Returns the last known device state as a string-keyed mapping.
    #[must_use]
    pub fn state_map(&self) -> Map<String, Value> {
        self.session.state.read().to_map()
    }

    /// Returns the current session phase.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        *self.session.phase.borrow()
    }

    /// Returns `true` once a status frame has been decoded on the current link.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.session_state() == SessionState::Ready
    }

    /// Returns `true` while the link is up.
    pub async fn is_connected(&self) -> bool {
        self.transport.is_connected().await
    }
}

impl<E: LinkEstablisher> std::fmt::Debug for Grill<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grill")
            .field("transport", &self.transport)
            .field("session_state", &self.session_state())
            .field("state", &self.state())
            .field("observers", &self.session.observers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_frame(actual_raw: u16, set_celsius: u16) -> Vec<u8> {
        let mut frame = vec![0u8; 26];
        frame[0] = 0xFA;
        frame[1] = 0x1A;
        frame[8..10].copy_from_slice(&actual_raw.to_be_bytes());
        frame[22..24].copy_from_slice(&set_celsius.to_be_bytes());
        frame
    }

    #[test]
    fn session_state_is_connected() {
        assert!(!SessionState::Disconnected.is_connected());
        assert!(!SessionState::Connecting.is_connected());
        assert!(SessionState::AwaitingFirstSample.is_connected());
        assert!(SessionState::Ready.is_connected());
    }

    #[test]
    fn valid_frame_updates_state_and_readiness() {
        let session = Session::new("grill".to_string());
        session.set_phase(SessionState::AwaitingFirstSample);

        session.handle_notification(&status_frame(0x0898, 0x0063));

        let state = session.state.read().clone();
        assert_eq!(state.actual_temperature_f(), Some(220));
        assert_eq!(state.set_temperature_f(), Some(210));
        assert_eq!(state.module_on(), Some(true));
        assert_eq!(*session.phase.borrow(), SessionState::Ready);
    }

    #[test]
    fn invalid_frames_are_ignored() {
        let session = Session::new("grill".to_string());
        session.set_phase(SessionState::AwaitingFirstSample);

        session.handle_notification(&[0xFA, 0x1A, 0x00]);
        let mut wrong_header = status_frame(0x0898, 0x0063);
        wrong_header[0] = 0x00;
        session.handle_notification(&wrong_header);

        assert!(session.state.read().is_empty());
        assert_eq!(*session.phase.borrow(), SessionState::AwaitingFirstSample);
    }

    #[test]
    fn readiness_is_one_shot() {
        let session = Session::new("grill".to_string());
        session.set_phase(SessionState::AwaitingFirstSample);

        assert!(session.mark_ready());
        assert!(!session.mark_ready());
    }

    #[test]
    fn frames_while_disconnected_do_not_mark_ready() {
        let session = Session::new("grill".to_string());
        session.handle_notification(&status_frame(0x0898, 0x0063));
        assert_eq!(*session.phase.borrow(), SessionState::Disconnected);
    }

    #[test]
    fn mark_connected_keeps_early_readiness() {
        let session = Session::new("grill".to_string());
        session.set_phase(SessionState::Connecting);

        // The wake frame can trigger a status frame before connect() returns
        session.handle_notification(&status_frame(0x0898, 0x0063));
        session.mark_connected();

        assert_eq!(*session.phase.borrow(), SessionState::Ready);
    }
}
