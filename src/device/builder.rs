// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill session builder.

use std::time::Duration;

use crate::device::{Grill, GrillConfig};
use crate::protocol::{Characteristics, LinkEstablisher, RetryPolicy};

/// Builder for creating grill sessions.
///
/// Building performs no I/O; the link is only opened by
/// [`Grill::start`].
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use grillmor_lib::Grill;
///
/// let grill = Grill::builder(establisher, "AA:BB:CC:DD:EE:FF")
///     .with_readiness_timeout(Duration::from_secs(20))
///     .build();
/// ```
#[derive(Debug)]
pub struct GrillBuilder<E> {
    establisher: E,
    address: String,
    config: GrillConfig,
}

impl<E: LinkEstablisher> GrillBuilder<E> {
    /// Creates a new builder for the device at `address`.
    pub(crate) fn new(establisher: E, address: impl Into<String>) -> Self {
        Self {
            establisher,
            address: address.into(),
            config: GrillConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: GrillConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the connection retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config = self.config.with_retry_policy(policy);
        self
    }

    /// Sets how long `start()` waits for the first status frame.
    #[must_use]
    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_readiness_timeout(timeout);
        self
    }

    /// Sets the GATT characteristics.
    #[must_use]
    pub fn with_characteristics(mut self, characteristics: Characteristics) -> Self {
        self.config = self.config.with_characteristics(characteristics);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &GrillConfig {
        &self.config
    }

    /// Builds the session in the disconnected state.
    #[must_use]
    pub fn build(self) -> Grill<E> {
        Grill::new(self.establisher, self.address, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::{DisconnectHandler, LinkClient, NotificationHandler};
    use uuid::Uuid;

    struct NoLink;

    impl LinkEstablisher for NoLink {
        type Client = NoLink;

        async fn establish(
            &self,
            address: &str,
            _on_disconnect: DisconnectHandler,
        ) -> Result<NoLink, ProtocolError> {
            Err(ProtocolError::DeviceNotFound(address.to_string()))
        }
    }

    impl LinkClient for NoLink {
        async fn enable_notifications(
            &self,
            _characteristic: Uuid,
            _handler: NotificationHandler,
        ) -> Result<(), ProtocolError> {
            Ok(())
        }

        async fn write(
            &self,
            _characteristic: Uuid,
            _data: &[u8],
            _with_response: bool,
        ) -> Result<(), ProtocolError> {
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), ProtocolError> {
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            false
        }
    }

    #[test]
    fn builder_new() {
        let builder = GrillBuilder::new(NoLink, "AA:BB:CC:DD:EE:FF");
        assert_eq!(builder.address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(builder.config(), &GrillConfig::default());
    }

    #[test]
    fn builder_chain() {
        let builder = GrillBuilder::new(NoLink, "grill")
            .with_readiness_timeout(Duration::from_secs(1))
            .with_retry_policy(RetryPolicy::no_retry())
            .with_characteristics(Characteristics::new(Uuid::nil(), Uuid::from_u128(1)));

        assert_eq!(builder.config().readiness_timeout(), Duration::from_secs(1));
        assert_eq!(builder.config().retry_policy().max_attempts(), 1);
        assert_eq!(builder.config().characteristics().write(), Uuid::nil());
    }

    #[test]
    fn build_is_disconnected() {
        let grill = GrillBuilder::new(NoLink, "grill").build();
        assert_eq!(grill.address(), "grill");
        assert!(!grill.is_ready());
        assert!(grill.state().is_empty());
    }
}
