// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wake command.

use crate::command::{Command, FRAME_END, FRAME_START};

/// Nudges the controller into its active reporting state.
///
/// Sent once after notifications are enabled. The controller does not reply
/// to it directly; status frames start arriving on the notify characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakeCommand;

impl Command for WakeCommand {
    fn name(&self) -> &'static str {
        "Wake"
    }

    fn to_bytes(&self) -> Vec<u8> {
        vec![FRAME_START, 0x06, 0xFE, 0x0B, 0x01, FRAME_END]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_frame() {
        assert_eq!(WakeCommand.to_bytes(), [0xFA, 0x06, 0xFE, 0x0B, 0x01, 0xFF]);
        assert_eq!(WakeCommand.to_hex(), "fa06fe0b01ff");
    }
}
