// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Owned handle to the host's render view.

/// Sub-bridge for the host rendering surface.
///
/// Created by `HostBridge::view` from the result of the "get render view"
/// host call and owned by the bridge until it is dropped. The bridge never
/// looks inside the handle.
#[derive(Debug)]
pub struct ViewBridge<O> {
    handle: O,
}

impl<O> ViewBridge<O> {
    pub(crate) fn new(handle: O) -> Self {
        Self { handle }
    }

    /// Host reference to the render view.
    pub fn handle(&self) -> &O {
        &self.handle
    }
}

impl<O> Drop for ViewBridge<O> {
    fn drop(&mut self) {
        tracing::debug!("releasing render view");
    }
}
