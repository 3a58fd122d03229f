// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `GrillmoR` library.
//!
//! This module provides the error hierarchy for the library: setpoint
//! validation, link communication, and status frame parsing.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested value was rejected before anything was transmitted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred on the BLE link.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A status frame could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A command was attempted while the link is down.
    #[error("device is not connected")]
    NotConnected,
}

/// Errors related to setpoint validation.
///
/// These errors occur before any frame is built, so a rejected request never
/// reaches the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The temperature is below the lowest dial position.
    #[error("temperature {actual}°F is below the minimum of {min}°F")]
    BelowMinimum {
        /// Lowest supported temperature in °F.
        min: i32,
        /// The requested temperature in °F.
        actual: i32,
    },

    /// The temperature maps to a dial index that does not fit in one byte.
    #[error("temperature {actual}°F is out of range [{min}, {max}]")]
    OutOfRange {
        /// Lowest supported temperature in °F.
        min: i32,
        /// Highest indexable temperature in °F.
        max: i32,
        /// The requested temperature in °F.
        actual: i32,
    },
}

/// Errors related to the BLE link.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// btleplug reported an error.
    #[cfg(feature = "btleplug")]
    #[error("BLE error: {0}")]
    Btleplug(#[from] btleplug::Error),

    /// Link establishment failed after exhausting all retries.
    #[error("connection failed after {attempts} attempt(s): {reason}")]
    ConnectionFailed {
        /// Number of attempts made.
        attempts: u32,
        /// Failure reported by the last attempt.
        reason: String,
    },

    /// A link-level operation failed.
    #[error("link error: {0}")]
    Link(String),

    /// No peripheral with the given address was found.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The peripheral does not expose the expected characteristic.
    #[error("characteristic {0} not found")]
    CharacteristicNotFound(Uuid),
}

/// Errors related to parsing status notifications.
///
/// The controller treats these as traffic filtering: they are logged at debug
/// level and never surfaced to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The frame is shorter than a status frame.
    #[error("frame too short: {len} bytes, expected at least {min}")]
    TooShort {
        /// Actual frame length.
        len: usize,
        /// Minimum status frame length.
        min: usize,
    },

    /// The frame does not start with the status header.
    #[error("unexpected frame header {0:02X} {1:02X}")]
    UnexpectedHeader(u8, u8),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
