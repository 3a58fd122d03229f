// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `GrillmoR` Lib - A Rust library to control BLE pellet grill controllers.
//!
//! This library speaks the controller's small binary protocol over a GATT
//! link: a wake frame, a set-temperature frame, and periodic status
//! notifications carrying the measured and target temperatures.
//!
//! # Supported Features
//!
//! - **Temperature control**: Dial positions from 180°F in 5°F steps, plus
//!   high-power mode from 500°F
//! - **Status decoding**: Actual and set temperature from status frames
//! - **State observation**: One observer receiving the accumulated state
//! - **Readiness**: `start()` waits, bounded, for the first status frame
//!
//! # Quick Start
//!
//! With the `btleplug` feature enabled:
//!
//! ```ignore
//! use grillmor_lib::{Grill, Readiness};
//! use grillmor_lib::protocol::BtleplugEstablisher;
//!
//! #[tokio::main]
//! async fn main() -> grillmor_lib::Result<()> {
//!     let grill = Grill::builder(BtleplugEstablisher::new(), "AA:BB:CC:DD:EE:FF").build();
//!
//!     grill.register_observer(|state| {
//!         println!("grill at {:?}°F", state.actual_temperature_f());
//!     });
//!
//!     if grill.start().await? == Readiness::Ready {
//!         grill.set_temperature(225).await?;
//!     }
//!
//!     grill.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Frames
//!
//! ```
//! use grillmor_lib::{Command, SetTemperatureCommand, WakeCommand};
//!
//! assert_eq!(WakeCommand.to_bytes(), [0xFA, 0x06, 0xFE, 0x0B, 0x01, 0xFF]);
//!
//! let cmd = SetTemperatureCommand::from_fahrenheit(350)?;
//! assert_eq!(cmd.to_bytes(), [0xFA, 0x09, 0xFE, 0x05, 0x01, 0x03, 0x22, 0x00, 0xFF]);
//! # Ok::<(), grillmor_lib::ValueError>(())
//! ```
//!
//! # Custom Link Layers
//!
//! The radio is abstracted by [`protocol::LinkEstablisher`] and
//! [`protocol::LinkClient`]. Any BLE stack, or an in-memory fake, can drive a
//! [`Grill`] by implementing those two traits.

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod types;

pub use command::{Command, SetTemperatureCommand, WakeCommand};
pub use device::{Grill, GrillBuilder, GrillConfig, Readiness, SessionState};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use state::{DeviceState, StateChange};
pub use telemetry::{StatusFrame, parse_status};
pub use types::{DialIndex, TargetTemperature};
