// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer storage and dispatch.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::state::DeviceState;

/// Observer receiving the full device state after each decoded status frame.
pub type StateObserver = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Callback invoked when the link drops unexpectedly.
pub type DisconnectedCallback = Arc<dyn Fn() + Send + Sync>;

/// Single-slot registry for a session's callbacks.
///
/// Each slot holds at most one callback; registering replaces the previous
/// one. Callbacks are cloned out of the lock before being invoked, so a
/// callback may safely re-register or clear itself.
pub struct ObserverSlot {
    /// State observer.
    observer: RwLock<Option<StateObserver>>,
    /// Disconnection callback.
    disconnected: RwLock<Option<DisconnectedCallback>>,
}

impl ObserverSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: RwLock::new(None),
            disconnected: RwLock::new(None),
        }
    }

    /// Registers the state observer.
    ///
    /// Returns `true` if a previous observer was replaced.
    pub fn set_observer<F>(&self, observer: F) -> bool
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.observer.write().replace(Arc::new(observer)).is_some()
    }

    /// Removes the state observer.
    ///
    /// Returns `true` if an observer was registered.
    pub fn clear_observer(&self) -> bool {
        self.observer.write().take().is_some()
    }

    /// Returns `true` if a state observer is registered.
    #[must_use]
    pub fn has_observer(&self) -> bool {
        self.observer.read().is_some()
    }

    /// Registers the disconnection callback.
    pub fn set_disconnected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.disconnected.write() = Some(Arc::new(callback));
    }

    /// Invokes the state observer, if any.
    pub fn dispatch(&self, state: &DeviceState) {
        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            observer(state);
        }
    }

    /// Invokes the disconnection callback, if any.
    pub fn dispatch_disconnected(&self) {
        let callback = self.disconnected.read().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl Default for ObserverSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("has_observer", &self.has_observer())
            .field("has_disconnected", &self.disconnected.read().is_some())
            .finish()
    }
}
