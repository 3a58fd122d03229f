// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature setpoint command.

use crate::command::{Command, FRAME_END, FRAME_START};
use crate::error::ValueError;
use crate::types::TargetTemperature;

/// Header shared by both setpoint variants: start, length, marker, opcode, channel.
const SET_TEMPERATURE_HEADER: [u8; 5] = [FRAME_START, 0x09, 0xFE, 0x05, 0x01];

/// Mode byte selecting an indexed dial position.
const MODE_DIAL: u8 = 0x03;

/// Mode byte selecting high-power mode.
const MODE_HIGH: u8 = 0x05;

/// Sets the grill target temperature.
///
/// # Examples
///
/// ```
/// use grillmor_lib::command::{Command, SetTemperatureCommand};
///
/// let high = SetTemperatureCommand::from_fahrenheit(500).unwrap();
/// assert_eq!(
///     high.to_bytes(),
///     vec![0xFA, 0x09, 0xFE, 0x05, 0x01, 0x05, 0x00, 0x00, 0xFF]
/// );
///
/// assert!(SetTemperatureCommand::from_fahrenheit(179).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTemperatureCommand {
    target: TargetTemperature,
}

impl SetTemperatureCommand {
    /// Creates a command for an already-validated setpoint.
    #[must_use]
    pub const fn new(target: TargetTemperature) -> Self {
        Self { target }
    }

    /// Creates a command from a Fahrenheit temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the temperature is below the dial minimum.
    pub fn from_fahrenheit(fahrenheit: i32) -> Result<Self, ValueError> {
        TargetTemperature::from_fahrenheit(fahrenheit).map(Self::new)
    }

    /// Returns the setpoint carried by this command.
    #[must_use]
    pub const fn target(&self) -> TargetTemperature {
        self.target
    }
}

impl Command for SetTemperatureCommand {
    fn name(&self) -> &'static str {
        "SetTemperature"
    }

    fn to_bytes(&self) -> Vec<u8> {
        let (mode, index) = match self.target {
            TargetTemperature::Dial(index) => (MODE_DIAL, index.value()),
            TargetTemperature::High => (MODE_HIGH, 0x00),
        };

        let mut frame = Vec::with_capacity(9);
        frame.extend_from_slice(&SET_TEMPERATURE_HEADER);
        frame.extend_from_slice(&[mode, index, 0x00, FRAME_END]);
        frame
    }
}
