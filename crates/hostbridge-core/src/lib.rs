// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hostbridge — Core types, error definitions and configuration shared by the
// bridge crate and its tooling.

pub mod config;
pub mod error;
pub mod logging;
pub mod operation;
pub mod types;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use operation::{Operation, OperationKind};
pub use types::*;
