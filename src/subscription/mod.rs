// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer support for grill state updates.
//!
//! A session has room for exactly one state observer. The observer receives
//! the complete accumulated [`DeviceState`](crate::state::DeviceState) after
//! every decoded status frame, not just the fields in that frame.
//!
//! # Usage
//!
//! ```ignore
//! let grill = Grill::builder(establisher, "AA:BB:CC:DD:EE:FF").build();
//!
//! grill.register_observer(|state| {
//!     println!("Grill at {:?}°F", state.actual_temperature_f());
//! });
//! ```
//!
//! # Delivery
//!
//! Observers run synchronously on the notification path. An observer that
//! blocks holds up delivery of the next status frame; hand slow work off to a
//! task or channel instead.

mod observer;

pub use observer::{DisconnectedCallback, ObserverSlot, StateObserver};
