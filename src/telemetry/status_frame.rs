// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for controller status frames.

use crate::command::FRAME_START;
use crate::error::ParseError;
use crate::state::StateChange;

/// Second header byte of a status frame.
const STATUS_MARKER: u8 = 0x1A;

/// Byte offset of the measured temperature (°F × 10, big-endian).
const ACTUAL_TEMPERATURE_OFFSET: usize = 8;

/// Byte offset of the setpoint (whole °C, big-endian).
const SET_TEMPERATURE_OFFSET: usize = 22;

/// Decoded status frame.
///
/// Only the fields whose meaning has been confirmed are decoded; the rest of
/// the frame is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame {
    actual_raw: u16,
    set_celsius: u16,
}

impl StatusFrame {
    /// Minimum length of a status frame.
    pub const MIN_LEN: usize = 26;

    /// Parses a raw payload.
    ///
    /// A payload is a status frame when it is at least [`Self::MIN_LEN`]
    /// bytes long and starts with `FA 1A`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::TooShort` or `ParseError::UnexpectedHeader`.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::TooShort {
                len: data.len(),
                min: Self::MIN_LEN,
            });
        }
        if data[0] != FRAME_START || data[1] != STATUS_MARKER {
            return Err(ParseError::UnexpectedHeader(data[0], data[1]));
        }

        Ok(Self {
            actual_raw: read_u16(data, ACTUAL_TEMPERATURE_OFFSET),
            set_celsius: read_u16(data, SET_TEMPERATURE_OFFSET),
        })
    }

    /// Returns the measured temperature in whole °F (truncated).
    #[must_use]
    pub fn actual_temperature_f(&self) -> i32 {
        i32::from(self.actual_raw) / 10
    }

    /// Returns the setpoint in whole °C as reported by the controller.
    #[must_use]
    pub fn set_temperature_c(&self) -> u16 {
        self.set_celsius
    }

    /// Returns the setpoint converted to whole °F (truncated).
    #[must_use]
    pub fn set_temperature_f(&self) -> i32 {
        i32::from(self.set_celsius) * 9 / 5 + 32
    }

    /// Converts the frame into the state changes it implies.
    #[must_use]
    pub fn to_state_change(&self) -> StateChange {
        StateChange::batch(vec![
            StateChange::ActualTemperature(self.actual_temperature_f()),
            StateChange::SetTemperature(self.set_temperature_f()),
            StateChange::ModuleOn(true),
        ])
    }
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}
