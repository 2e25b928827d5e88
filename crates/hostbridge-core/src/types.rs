// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Value types that cross the native/host boundary.

use serde::{Deserialize, Serialize};

/// Categorical result of a host operation that can fail.
///
/// The host reports failures as plain integers; they are folded into this
/// small set so callers never see raw host codes or exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The host accepted or completed the request.
    Ok,
    /// The host ran the operation and it failed.
    Failed,
    /// The operation does not exist on this host build.
    Unsupported,
    /// The host rejected one of the arguments.
    InvalidArgument,
    /// File-system failure on the host side (missing keystore, unreadable APK, ...).
    Io,
}

impl ErrorCode {
    /// Map an integer error code returned by the host into a category.
    ///
    /// Codes follow the engine's error enumeration: `0` is success, `2` and
    /// `3` mean unavailable/unconfigured, `7..=18` is the file error range and
    /// `5` and `31` are parameter errors.
    pub fn from_host(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            2 | 3 => Self::Unsupported,
            7..=18 => Self::Io,
            5 | 31 => Self::InvalidArgument,
            _ => Self::Failed,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Unsupported => "unsupported",
            Self::InvalidArgument => "invalid argument",
            Self::Io => "I/O failure",
        };
        f.write_str(label)
    }
}

/// RGBA color with normalized `0.0..=1.0` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Fully transparent black, returned when the host cannot report a color.
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Unpack a host color int laid out as `0xAARRGGBB`.
    pub fn from_argb(packed: i32) -> Self {
        let packed = packed as u32;
        let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
            a: channel(24),
        }
    }
}

/// Selection mode for the host file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePickerMode {
    OpenFile,
    OpenFiles,
    OpenDir,
    OpenAny,
    SaveFile,
}

impl FilePickerMode {
    /// Integer value the host expects for this mode.
    pub fn host_value(self) -> i32 {
        match self {
            Self::OpenFile => 0,
            Self::OpenFiles => 1,
            Self::OpenDir => 2,
            Self::OpenAny => 3,
            Self::SaveFile => 4,
        }
    }
}
