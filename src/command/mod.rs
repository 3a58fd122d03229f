// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grill command frames.
//!
//! This module provides typed representations of the binary frames written
//! to the controller's write characteristic.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Bytes |
//! |-------------|---------|-------|
//! | [`WakeCommand`] | Nudge the controller into reporting | `FA 06 FE 0B 01 FF` |
//! | [`SetTemperatureCommand`] | Select a dial position | `FA 09 FE 05 01 03 <idx> 00 FF` |
//! | [`SetTemperatureCommand`] | Select high-power mode | `FA 09 FE 05 01 05 00 00 FF` |
//!
//! # Frame Structure
//!
//! Every frame starts with [`FRAME_START`], followed by its total length,
//! a fixed `FE` marker and an opcode, and ends with [`FRAME_END`].
//!
//! # Examples
//!
//! ```
//! use grillmor_lib::command::{Command, SetTemperatureCommand};
//!
//! let cmd = SetTemperatureCommand::from_fahrenheit(350).unwrap();
//! assert_eq!(cmd.name(), "SetTemperature");
//! assert_eq!(
//!     cmd.to_bytes(),
//!     vec![0xFA, 0x09, 0xFE, 0x05, 0x01, 0x03, 0x22, 0x00, 0xFF]
//! );
//! ```

mod temperature;
mod wake;

pub use temperature::SetTemperatureCommand;
pub use wake::WakeCommand;

/// First byte of every frame in both directions.
pub const FRAME_START: u8 = 0xFA;

/// Last byte of every outbound frame.
pub const FRAME_END: u8 = 0xFF;

/// A command that can be written to the grill controller.
pub trait Command {
    /// Returns a short human-readable command name for logging.
    fn name(&self) -> &'static str;

    /// Returns the exact frame bytes to write.
    fn to_bytes(&self) -> Vec<u8>;

    /// Returns the frame as lowercase hex, for logging.
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_hex_format() {
        let cmd = SetTemperatureCommand::from_fahrenheit(350).unwrap();
        assert_eq!(cmd.to_hex(), "fa09fe0501032200ff");
    }

    #[test]
    fn frames_are_delimited() {
        let frames = [
            WakeCommand.to_bytes(),
            SetTemperatureCommand::from_fahrenheit(225).unwrap().to_bytes(),
            SetTemperatureCommand::from_fahrenheit(500).unwrap().to_bytes(),
        ];
        for frame in frames {
            assert_eq!(frame.first(), Some(&FRAME_START));
            assert_eq!(frame.last(), Some(&FRAME_END));
            assert_eq!(usize::from(frame[1]), frame.len());
        }
    }
}
