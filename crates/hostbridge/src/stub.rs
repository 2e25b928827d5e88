// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process host runtime for desktop/CI builds where no JVM is available.
//
// `StubHost` pretends to be a host object whose class provides a chosen
// subset of the operation catalog. It answers calls with canned responses
// and records every lookup and call so tests can check how the bridge
// talks to its host.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hostbridge_core::error::{BridgeError, Result};
use hostbridge_core::operation::Operation;

use crate::host::{HostArg, HostRuntime, HostValue};
use crate::signature::{Shape, Signature};

/// Canned answer for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StubResponse {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    StrArray(Vec<String>),
    /// Null reference of whatever type the operation returns.
    Null,
    /// The host call raises with this message.
    Fail(String),
}

impl StubResponse {
    /// Whether this response can stand in for a value of shape `ret`.
    fn fits(&self, ret: Shape) -> bool {
        match self {
            Self::Null | Self::Fail(_) => true,
            Self::Bool(_) => ret == Shape::Bool,
            Self::Int(_) => ret == Shape::Int,
            Self::Float(_) => ret == Shape::Float,
            Self::Str(_) => ret == Shape::Str,
            Self::StrArray(_) => ret == Shape::StrArray,
        }
    }
}

/// Description of a host build, loadable from JSON.
///
/// ```json
/// { "missing": ["get_accent_color"], "responses": { "get_clipboard": { "str": "hello" } } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfile {
    /// Whether the host object's class can be resolved at all.
    pub class_available: bool,
    /// Operations this host build lacks. Everything else is present.
    pub missing: Vec<Operation>,
    pub responses: HashMap<Operation, StubResponse>,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            class_available: true,
            missing: Vec::new(),
            responses: HashMap::new(),
        }
    }
}

impl HostProfile {
    /// Parse a profile and check every canned response against the return
    /// type of the operation it answers.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject responses the bridge could never accept, such as an int for
    /// an object-returning operation.
    pub fn validate(&self) -> Result<()> {
        for (&op, response) in &self.responses {
            let ret = Signature::parse(op.descriptor())?.ret();
            if !response.fits(ret) {
                return Err(BridgeError::Marshal {
                    operation: op.host_name().into(),
                    detail: format!("profile response {response:?} cannot answer {ret}"),
                });
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Owned copy of an argument the stub received.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedArg {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    StrArray(Vec<String>),
}

impl From<&HostArg<'_>> for RecordedArg {
    fn from(arg: &HostArg<'_>) -> Self {
        match *arg {
            HostArg::Bool(v) => Self::Bool(v),
            HostArg::Int(v) => Self::Int(v),
            HostArg::Float(v) => Self::Float(v),
            HostArg::Str(v) => Self::Str(v.to_owned()),
            HostArg::StrArray(v) => Self::StrArray(v.to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub args: Vec<RecordedArg>,
}

/// Class descriptor handed out by [`StubHost`].
#[derive(Debug)]
pub struct StubClass;

/// Method reference handed out by [`StubHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubMethod(Operation);

/// Object reference returned from object-typed stub calls. Every call
/// produces a fresh id.
#[derive(Debug, PartialEq, Eq)]
pub struct StubObject {
    pub id: u64,
}

#[derive(Debug, Default)]
struct StubLog {
    resolutions: HashMap<String, usize>,
    invocations: HashMap<Operation, usize>,
    calls: Vec<RecordedCall>,
}

/// Configurable, recording host runtime.
#[derive(Debug)]
pub struct StubHost {
    class_available: bool,
    available: HashSet<Operation>,
    responses: HashMap<Operation, StubResponse>,
    view_delay: Option<Duration>,
    record_calls: bool,
    next_object: AtomicU64,
    log: Mutex<StubLog>,
}

impl StubHost {
    /// Host build providing every operation.
    pub fn full() -> Self {
        Self::with_operations(Operation::ALL.iter().copied().collect())
    }

    /// Host build providing no operations.
    pub fn empty() -> Self {
        Self::with_operations(HashSet::new())
    }

    pub fn from_profile(profile: HostProfile) -> Self {
        let mut host = Self::full();
        for op in &profile.missing {
            host.available.remove(op);
        }
        host.responses = profile.responses;
        host.class_available = profile.class_available;
        host
    }

    fn with_operations(available: HashSet<Operation>) -> Self {
        Self {
            class_available: true,
            available,
            responses: HashMap::new(),
            view_delay: None,
            record_calls: true,
            next_object: AtomicU64::new(1),
            log: Mutex::new(StubLog::default()),
        }
    }

    pub fn with(mut self, op: Operation) -> Self {
        self.available.insert(op);
        self
    }

    pub fn without(mut self, op: Operation) -> Self {
        self.available.remove(&op);
        self
    }

    pub fn respond(mut self, op: Operation, response: StubResponse) -> Self {
        self.responses.insert(op, response);
        self
    }

    /// Make class resolution fail.
    pub fn without_class(mut self) -> Self {
        self.class_available = false;
        self
    }

    /// Stall every "get render view" call, widening the window in which
    /// concurrent first accesses can race.
    pub fn with_view_delay(mut self, delay: Duration) -> Self {
        self.view_delay = Some(delay);
        self
    }

    /// Keep counting calls but stop recording their arguments.
    pub fn without_call_log(mut self) -> Self {
        self.record_calls = false;
        self
    }

    /// How many times the bridge looked up `op` by name.
    pub fn resolution_count(&self, op: Operation) -> usize {
        self.log()
            .resolutions
            .get(op.host_name())
            .copied()
            .unwrap_or(0)
    }

    /// How many times the bridge called into `op`.
    pub fn invocation_count(&self, op: Operation) -> usize {
        self.log().invocations.get(&op).copied().unwrap_or(0)
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log().calls.clone()
    }

    /// Argument lists of every call to `op`, in order.
    pub fn calls_to(&self, op: Operation) -> Vec<Vec<RecordedArg>> {
        self.log()
            .calls
            .iter()
            .filter(|call| call.operation == op)
            .map(|call| call.args.clone())
            .collect()
    }

    fn log(&self) -> MutexGuard<'_, StubLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_object(&self) -> StubObject {
        StubObject {
            id: self.next_object.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn default_value(&self, ret: Shape) -> HostValue<StubObject> {
        match ret {
            Shape::Void => HostValue::Void,
            Shape::Bool => HostValue::Bool(false),
            Shape::Int => HostValue::Int(0),
            Shape::Float => HostValue::Float(0.0),
            Shape::Str => HostValue::Str(String::new()),
            Shape::StrArray => HostValue::StrArray(Vec::new()),
            Shape::Object => HostValue::Object(Some(self.new_object())),
        }
    }
}

impl HostRuntime for StubHost {
    type Class = StubClass;
    type MethodRef = StubMethod;
    type Object = StubObject;

    fn resolve_class(&self) -> Result<StubClass> {
        if self.class_available {
            Ok(StubClass)
        } else {
            Err(BridgeError::ClassUnavailable(
                "stub host configured without a class".into(),
            ))
        }
    }

    fn resolve_method(
        &self,
        _class: &StubClass,
        name: &str,
        descriptor: &str,
    ) -> Option<StubMethod> {
        *self.log().resolutions.entry(name.to_owned()).or_insert(0) += 1;

        Operation::ALL
            .iter()
            .find(|op| op.host_name() == name && op.descriptor() == descriptor)
            .filter(|op| self.available.contains(*op))
            .map(|&op| StubMethod(op))
    }

    fn invoke(
        &self,
        method: StubMethod,
        signature: &Signature,
        args: &[HostArg<'_>],
    ) -> Result<HostValue<StubObject>> {
        let StubMethod(op) = method;
        tracing::trace!(operation = %op, "stub host call");
        {
            let mut log = self.log();
            *log.invocations.entry(op).or_insert(0) += 1;
            if self.record_calls {
                log.calls.push(RecordedCall {
                    operation: op,
                    args: args.iter().map(RecordedArg::from).collect(),
                });
            }
        }

        if op == Operation::GetRenderView {
            if let Some(delay) = self.view_delay {
                std::thread::sleep(delay);
            }
        }

        let Some(response) = self.responses.get(&op) else {
            return Ok(self.default_value(signature.ret()));
        };

        let value = match response {
            StubResponse::Bool(v) => HostValue::Bool(*v),
            StubResponse::Int(v) => HostValue::Int(*v),
            StubResponse::Float(v) => HostValue::Float(*v),
            StubResponse::Str(v) => HostValue::Str(v.clone()),
            StubResponse::StrArray(v) => HostValue::StrArray(v.clone()),
            StubResponse::Null => match signature.ret() {
                Shape::Object => HostValue::Object(None),
                other => self.default_value(other),
            },
            StubResponse::Fail(message) => return Err(BridgeError::Host(message.clone())),
        };
        Ok(value)
    }
}
