// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status notification parsing.
//!
//! The controller periodically pushes status frames on its notify
//! characteristic. The notify channel also carries unrelated traffic, so
//! anything that does not look like a status frame is rejected with a
//! [`ParseError`] that callers are expected to log and drop.
//!
//! # Examples
//!
//! ```
//! use grillmor_lib::telemetry::parse_status;
//!
//! let mut frame = [0u8; 26];
//! frame[0] = 0xFA;
//! frame[1] = 0x1A;
//! frame[8..10].copy_from_slice(&2200u16.to_be_bytes());
//! frame[22..24].copy_from_slice(&99u16.to_be_bytes());
//!
//! let status = parse_status(&frame).unwrap();
//! assert_eq!(status.actual_temperature_f(), 220);
//! assert_eq!(status.set_temperature_f(), 210);
//!
//! assert!(parse_status(&frame[..10]).is_err());
//! ```

mod status_frame;

pub use status_frame::StatusFrame;

use crate::error::ParseError;

/// Parses a raw notification payload as a status frame.
///
/// # Errors
///
/// Returns `ParseError` if the payload is not a status frame.
pub fn parse_status(data: &[u8]) -> Result<StatusFrame, ParseError> {
    StatusFrame::parse(data)
}
