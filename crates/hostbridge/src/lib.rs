// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Hostbridge — native calls into a managed host application object.
//!
//! The bridge resolves a fixed catalog of host methods once, when it is
//! built, and exposes each one as a typed Rust method. Methods a given host
//! build lacks are reported through capability queries and answered with a
//! default value instead of a host call.
//!
//! The host runtime is abstracted behind [`HostRuntime`]. On Android the
//! [`android::JniHost`] backend talks to the JVM through `jni`; elsewhere the
//! in-process [`stub::StubHost`] stands in for it.

pub mod bridge;
pub mod host;
pub mod signature;
pub mod stub;
pub mod table;
pub mod view;

#[cfg(target_os = "android")]
pub mod android;

pub use bridge::HostBridge;
pub use host::{HostArg, HostRuntime, HostValue};
pub use signature::{Shape, Signature};
pub use table::{CapabilityEntry, CapabilityReport, OperationTable};
pub use view::ViewBridge;

pub use hostbridge_core::{BridgeConfig, BridgeError, Color, ErrorCode, FilePickerMode, Operation};
