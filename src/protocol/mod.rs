// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Link layer for communicating with grill controllers.
//!
//! The radio stack itself is an external collaborator, abstracted by two
//! traits:
//!
//! - [`LinkEstablisher`]: connects to a device address and hands back a client
//! - [`LinkClient`]: a connected GATT client exposing notify and write
//!
//! [`Transport`] sits on top of them and owns the connection lifecycle:
//! connect retries, notification forwarding, the wake frame, and raw sends.
//!
//! # Implementations
//!
//! - `BtleplugEstablisher` (feature `btleplug`): real BLE links through the
//!   btleplug crate
//!
//! Any other stack can be plugged in by implementing the two traits, which is
//! also how the test suite drives the transport without a radio.

#[cfg(feature = "btleplug")]
mod btle;
mod retry;
mod transport;

#[cfg(feature = "btleplug")]
pub use btle::{BtleplugClient, BtleplugEstablisher};
pub use retry::RetryPolicy;
pub use transport::Transport;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProtocolError;

/// Handler invoked with each raw notification payload.
pub type NotificationHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Handler invoked when the link layer observes a disconnection.
pub type DisconnectHandler = Arc<dyn Fn() + Send + Sync>;

/// GATT characteristic identifiers used by the controller.
///
/// # Examples
///
/// ```
/// use grillmor_lib::protocol::Characteristics;
///
/// let chars = Characteristics::default();
/// assert_eq!(chars.write().to_string(), "0000abf1-0000-1000-8000-00805f9b34fb");
/// assert_eq!(chars.notify().to_string(), "0000abf2-0000-1000-8000-00805f9b34fb");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Characteristics {
    write: Uuid,
    notify: Uuid,
}

impl Characteristics {
    /// Default write characteristic.
    pub const DEFAULT_WRITE: Uuid = Uuid::from_u128(0x0000_abf1_0000_1000_8000_0080_5f9b_34fb);
    /// Default notify characteristic.
    pub const DEFAULT_NOTIFY: Uuid = Uuid::from_u128(0x0000_abf2_0000_1000_8000_0080_5f9b_34fb);

    /// Creates a characteristic pair.
    #[must_use]
    pub const fn new(write: Uuid, notify: Uuid) -> Self {
        Self { write, notify }
    }

    /// Returns the characteristic commands are written to.
    #[must_use]
    pub const fn write(&self) -> Uuid {
        self.write
    }

    /// Returns the characteristic status frames are notified on.
    #[must_use]
    pub const fn notify(&self) -> Uuid {
        self.notify
    }
}

impl Default for Characteristics {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WRITE, Self::DEFAULT_NOTIFY)
    }
}

/// Capability that establishes a link to a device.
///
/// Each call is one connection attempt; retries are driven by the
/// [`Transport`] according to its [`RetryPolicy`].
#[allow(async_fn_in_trait)]
pub trait LinkEstablisher {
    /// The connected client type.
    type Client: LinkClient;

    /// Connects to the device at `address`.
    ///
    /// `on_disconnect` must be invoked when the link layer observes the
    /// connection dropping.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if this attempt fails.
    async fn establish(
        &self,
        address: &str,
        on_disconnect: DisconnectHandler,
    ) -> Result<Self::Client, ProtocolError>;
}

/// A connected GATT client.
#[allow(async_fn_in_trait)]
pub trait LinkClient {
    /// Enables notifications on a characteristic.
    ///
    /// Each payload must be passed to `handler` before the next one is
    /// delivered.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if notifications cannot be enabled.
    async fn enable_notifications(
        &self,
        characteristic: Uuid,
        handler: NotificationHandler,
    ) -> Result<(), ProtocolError>;

    /// Writes bytes to a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the write fails.
    async fn write(
        &self,
        characteristic: Uuid,
        data: &[u8],
        with_response: bool,
    ) -> Result<(), ProtocolError>;

    /// Tears down the link.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the link layer reports a failure.
    async fn disconnect(&self) -> Result<(), ProtocolError>;

    /// Returns `true` while the link is up.
    async fn is_connected(&self) -> bool;
}
