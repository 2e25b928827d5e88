// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logging bootstrap for binaries embedding the bridge.
//
// The library crates only emit `tracing` events; installing a subscriber is
// left to whoever owns the process.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Calling this twice is harmless: the second install is
/// ignored.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
