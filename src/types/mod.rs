// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for grill control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so a rejected request never produces a command frame.
//!
//! # Types
//!
//! - [`DialIndex`] - Single-byte dial position (180°F + 5°F per step)
//! - [`TargetTemperature`] - A dial position or high-power mode

mod temperature;

pub use temperature::{DialIndex, TargetTemperature};
