// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint types for grill temperature control.
//!
//! The controller dial is indexed in 5°F steps starting at 180°F (index 0).
//! Temperatures of 500°F and above select a separate high-power mode that
//! bypasses the dial entirely.
//!
//! Only two dial positions have been confirmed against a real controller
//! (340°F and 350°F). The linear mapping between them is an assumption that
//! holds for those points and has not been verified elsewhere on the dial.

use std::fmt;

use crate::error::ValueError;

/// A single-byte dial position.
///
/// # Examples
///
/// ```
/// use grillmor_lib::types::DialIndex;
///
/// let index = DialIndex::from_fahrenheit(350).unwrap();
/// assert_eq!(index.value(), 34);
/// assert_eq!(index.fahrenheit(), 350);
///
/// // Temperatures between dial steps round down
/// assert_eq!(DialIndex::from_fahrenheit(354).unwrap().value(), 34);
///
/// // Below the first dial position
/// assert!(DialIndex::from_fahrenheit(179).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialIndex(u8);

impl DialIndex {
    /// Temperature at dial index 0, in °F.
    pub const BASE_FAHRENHEIT: i32 = 180;

    /// Temperature step between adjacent dial positions, in °F.
    pub const STEP_FAHRENHEIT: i32 = 5;

    /// Lowest dial position.
    pub const MIN: Self = Self(0);

    /// Highest dial position.
    pub const MAX: Self = Self(u8::MAX);

    /// Creates a dial index from a raw byte.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Maps a Fahrenheit temperature onto the dial.
    ///
    /// The index is `floor((T - 180) / 5)`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::BelowMinimum` if `fahrenheit` is below 180, or
    /// `ValueError::OutOfRange` if the index does not fit in one byte.
    pub fn from_fahrenheit(fahrenheit: i32) -> Result<Self, ValueError> {
        if fahrenheit < Self::BASE_FAHRENHEIT {
            return Err(ValueError::BelowMinimum {
                min: Self::BASE_FAHRENHEIT,
                actual: fahrenheit,
            });
        }

        let index = (fahrenheit - Self::BASE_FAHRENHEIT) / Self::STEP_FAHRENHEIT;
        u8::try_from(index)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: Self::BASE_FAHRENHEIT,
                max: Self::MAX.fahrenheit() + Self::STEP_FAHRENHEIT - 1,
                actual: fahrenheit,
            })
    }

    /// Returns the raw index byte.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the temperature this dial position selects, in °F.
    #[must_use]
    pub fn fahrenheit(&self) -> i32 {
        Self::BASE_FAHRENHEIT + Self::STEP_FAHRENHEIT * i32::from(self.0)
    }
}

impl fmt::Display for DialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({}°F)", self.0, self.fahrenheit())
    }
}

impl From<DialIndex> for u8 {
    fn from(index: DialIndex) -> Self {
        index.0
    }
}

/// A validated grill setpoint.
///
/// # Examples
///
/// ```
/// use grillmor_lib::types::{DialIndex, TargetTemperature};
///
/// assert_eq!(
///     TargetTemperature::from_fahrenheit(225).unwrap(),
///     TargetTemperature::Dial(DialIndex::new(9))
/// );
/// assert_eq!(
///     TargetTemperature::from_fahrenheit(600).unwrap(),
///     TargetTemperature::High
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetTemperature {
    /// An indexed dial position (180°F to 495°F in practice).
    Dial(DialIndex),
    /// High-power mode (500°F and above).
    High,
}

impl TargetTemperature {
    /// Lowest temperature that selects high-power mode, in °F.
    pub const HIGH_THRESHOLD_FAHRENHEIT: i32 = 500;

    /// Validates a Fahrenheit setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::BelowMinimum` for temperatures under 180°F.
    pub fn from_fahrenheit(fahrenheit: i32) -> Result<Self, ValueError> {
        if fahrenheit >= Self::HIGH_THRESHOLD_FAHRENHEIT {
            return Ok(Self::High);
        }
        DialIndex::from_fahrenheit(fahrenheit).map(Self::Dial)
    }

    /// Returns `true` for high-power mode.
    #[must_use]
    pub const fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dial(index) => write!(f, "dial {index}"),
            Self::High => f.write_str("high"),
        }
    }
}

impl TryFrom<i32> for TargetTemperature {
    type Error = ValueError;

    fn try_from(fahrenheit: i32) -> Result<Self, Self::Error> {
        Self::from_fahrenheit(fahrenheit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_index_floors_within_band() {
        for t in 180..500 {
            let index = DialIndex::from_fahrenheit(t).unwrap();
            let base = index.fahrenheit();
            assert!(base <= t && t < base + 5, "{t}°F mapped to {index}");
        }
    }

    #[test]
    fn dial_index_confirmed_points() {
        assert_eq!(DialIndex::from_fahrenheit(180).unwrap().value(), 0);
        assert_eq!(DialIndex::from_fahrenheit(350).unwrap().value(), 0x22);
        assert_eq!(DialIndex::from_fahrenheit(340).unwrap().value(), 32);
    }

    #[test]
    fn dial_index_below_minimum() {
        assert_eq!(
            DialIndex::from_fahrenheit(179),
            Err(ValueError::BelowMinimum { min: 180, actual: 179 })
        );
        assert!(DialIndex::from_fahrenheit(0).is_err());
        assert!(DialIndex::from_fahrenheit(-40).is_err());
    }

    #[test]
    fn dial_index_upper_bound() {
        assert_eq!(DialIndex::from_fahrenheit(1455).unwrap(), DialIndex::MAX);
        assert_eq!(DialIndex::from_fahrenheit(1459).unwrap(), DialIndex::MAX);
        assert_eq!(
            DialIndex::from_fahrenheit(1460),
            Err(ValueError::OutOfRange {
                min: 180,
                max: 1459,
                actual: 1460
            })
        );
    }

    #[test]
    fn target_high_mode() {
        assert_eq!(TargetTemperature::from_fahrenheit(500), Ok(TargetTemperature::High));
        assert_eq!(TargetTemperature::from_fahrenheit(600), Ok(TargetTemperature::High));
        assert!(TargetTemperature::High.is_high());
    }

    #[test]
    fn target_below_minimum() {
        assert!(TargetTemperature::try_from(179).is_err());
        assert!(TargetTemperature::try_from(0).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(DialIndex::new(0x22).to_string(), "0x22 (350°F)");
        assert_eq!(TargetTemperature::High.to_string(), "high");
    }
}
