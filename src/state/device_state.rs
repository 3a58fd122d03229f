// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use serde::Serialize;
use serde_json::{Map, Value};

use super::StateChange;

/// Last known state of a grill controller.
///
/// All fields are optional because nothing is known until the controller
/// reports it. Fields are only ever overwritten, never cleared: a value
/// represents the last reading received during the session, not the content
/// of the most recent frame.
///
/// # Examples
///
/// ```
/// use grillmor_lib::state::{DeviceState, StateChange};
///
/// let mut state = DeviceState::new();
/// assert!(state.is_empty());
///
/// state.apply(&StateChange::SetTemperature(210));
/// assert_eq!(state.set_temperature_f(), Some(210));
///
/// let map = state.to_map();
/// assert_eq!(map["set_temperature_f"], 210);
/// assert!(!map.contains_key("actual_temperature_f"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    /// Measured grill temperature in °F.
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_temperature_f: Option<i32>,
    /// Setpoint reported by the controller, in °F.
    #[serde(skip_serializing_if = "Option::is_none")]
    set_temperature_f: Option<i32>,
    /// Whether the controller module is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    module_on: Option<bool>,
    /// Setpoint most recently written by this session, in °F.
    #[serde(skip_serializing_if = "Option::is_none")]
    requested_temperature_f: Option<i32>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the measured grill temperature in °F.
    #[must_use]
    pub fn actual_temperature_f(&self) -> Option<i32> {
        self.actual_temperature_f
    }

    /// Gets the setpoint reported by the controller, in °F.
    #[must_use]
    pub fn set_temperature_f(&self) -> Option<i32> {
        self.set_temperature_f
    }

    /// Gets whether the controller module is on.
    #[must_use]
    pub fn module_on(&self) -> Option<bool> {
        self.module_on
    }

    /// Gets the setpoint most recently written by this session, in °F.
    #[must_use]
    pub fn requested_temperature_f(&self) -> Option<i32> {
        self.requested_temperature_f
    }

    /// Returns `true` if nothing has been reported or requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        fn overwrite<T: PartialEq + Copy>(field: &mut Option<T>, value: T) -> bool {
            if *field == Some(value) {
                false
            } else {
                *field = Some(value);
                true
            }
        }

        match change {
            StateChange::ActualTemperature(f) => overwrite(&mut self.actual_temperature_f, *f),
            StateChange::SetTemperature(f) => overwrite(&mut self.set_temperature_f, *f),
            StateChange::ModuleOn(on) => overwrite(&mut self.module_on, *on),
            StateChange::RequestedTemperature(f) => {
                overwrite(&mut self.requested_temperature_f, *f)
            }
            StateChange::Batch(changes) => {
                let mut any_changed = false;
                for c in changes {
                    if self.apply(c) {
                        any_changed = true;
                    }
                }
                any_changed
            }
        }
    }

    /// Renders the known fields as a string-keyed mapping.
    ///
    /// Unknown fields are absent from the map rather than `null`.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
