// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the bridge.

use thiserror::Error;

/// Top-level error type for all bridge operations.
///
/// Only construction, the view accessor and configuration loading surface
/// these to callers. Typed call wrappers fold host failures into their
/// return value instead (see `ErrorCode`).
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Construction --
    #[error("host class could not be resolved: {0}")]
    ClassUnavailable(String),

    #[error("required host operation `{0}` is not available")]
    MissingOperation(String),

    // -- Dispatch --
    #[error("host operation `{0}` is not supported by this host build")]
    Unsupported(String),

    #[error("host call failed: {0}")]
    Host(String),

    #[error("marshaling mismatch in `{operation}`: {detail}")]
    Marshal { operation: String, detail: String },

    #[error("invalid operation signature: {0}")]
    Signature(String),

    #[error("host returned a null render view")]
    NullView,

    #[error("host runtime environment unavailable: {0}")]
    Env(String),

    // -- Configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
