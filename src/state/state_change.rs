// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are discrete updates applied to a
//! [`DeviceState`](super::DeviceState), either decoded from a status frame or
//! recorded after a setpoint command is written.
//!
//! # Change Types
//!
//! - [`StateChange::ActualTemperature`] - Measured grill temperature
//! - [`StateChange::SetTemperature`] - Setpoint reported by the controller
//! - [`StateChange::ModuleOn`] - Controller reporting status
//! - [`StateChange::RequestedTemperature`] - Setpoint last written by this session
//! - [`StateChange::Batch`] - Multiple changes grouped together
//!
//! # Examples
//!
//! ```
//! use grillmor_lib::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::ActualTemperature(220)));
//!
//! // Applying same change again returns false
//! assert!(!state.apply(&StateChange::ActualTemperature(220)));
//! ```

use serde::Serialize;

/// Represents a change in device state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StateChange {
    /// Measured temperature in °F.
    ActualTemperature(i32),

    /// Setpoint reported by the controller, in °F.
    SetTemperature(i32),

    /// Whether the controller module is on.
    ModuleOn(bool),

    /// Setpoint most recently written by this session, in °F.
    RequestedTemperature(i32),

    /// Multiple changes applied together.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this is a batch change.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_constructor() {
        let change = StateChange::batch(vec![
            StateChange::ActualTemperature(220),
            StateChange::ModuleOn(true),
        ]);
        assert!(change.is_batch());
        assert!(!StateChange::ModuleOn(true).is_batch());
    }

    #[test]
    fn serializes_externally_tagged() {
        let json = serde_json::to_string(&StateChange::SetTemperature(210)).unwrap();
        assert_eq!(json, r#"{"SetTemperature":210}"#);
    }
}
