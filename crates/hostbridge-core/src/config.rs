// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::operation::Operation;

/// Settings applied when a bridge is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Operations the embedding application cannot run without. If any of
    /// them fails to resolve, construction fails.
    pub required_operations: Vec<Operation>,
    /// Log each unresolved operation at debug level during construction.
    pub log_unresolved: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            required_operations: Vec::new(),
            log_unresolved: true,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration from a JSON document. Missing fields take their
    /// default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
