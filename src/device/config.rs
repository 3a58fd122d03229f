// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration.

use std::time::Duration;

use crate::protocol::{Characteristics, RetryPolicy};

/// Configuration for a grill session.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use grillmor_lib::GrillConfig;
/// use grillmor_lib::protocol::RetryPolicy;
///
/// // Defaults: 40 s readiness timeout, standard characteristics
/// let config = GrillConfig::default();
/// assert_eq!(config.readiness_timeout(), Duration::from_secs(40));
///
/// let config = GrillConfig::new()
///     .with_readiness_timeout(Duration::from_secs(10))
///     .with_retry_policy(RetryPolicy::no_retry());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GrillConfig {
    characteristics: Characteristics,
    retry_policy: RetryPolicy,
    readiness_timeout: Duration,
}

impl GrillConfig {
    /// Default time `start()` waits for the first status frame.
    pub const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_secs(40);

    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GATT characteristics.
    #[must_use]
    pub fn with_characteristics(mut self, characteristics: Characteristics) -> Self {
        self.characteristics = characteristics;
        self
    }

    /// Sets the connection retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets how long `start()` waits for the first status frame.
    #[must_use]
    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    /// Returns the GATT characteristics.
    #[must_use]
    pub fn characteristics(&self) -> Characteristics {
        self.characteristics
    }

    /// Returns the connection retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the readiness timeout.
    #[must_use]
    pub fn readiness_timeout(&self) -> Duration {
        self.readiness_timeout
    }
}

impl Default for GrillConfig {
    fn default() -> Self {
        Self {
            characteristics: Characteristics::default(),
            retry_policy: RetryPolicy::default(),
            readiness_timeout: Self::DEFAULT_READINESS_TIMEOUT,
        }
    }
}
