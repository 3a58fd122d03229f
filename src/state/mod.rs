// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! The [`DeviceState`] struct accumulates the last known readings of a grill
//! controller, while [`StateChange`] represents individual changes that can be
//! applied to it.
//!
//! # Examples
//!
//! ```
//! use grillmor_lib::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::ActualTemperature(220));
//!
//! assert_eq!(state.actual_temperature_f(), Some(220));
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
