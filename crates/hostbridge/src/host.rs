// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime-agnostic seam between the bridge and a host runtime.
//
// A `HostRuntime` owns the host object handle and knows how to look up
// methods on its class and call them. The bridge decides *what* to resolve
// and *when*; the runtime only does the lookups and calls it is asked for.

use std::fmt;

use hostbridge_core::error::Result;

use crate::signature::{Shape, Signature};

/// Argument marshaled into the host calling convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostArg<'a> {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(&'a str),
    /// Ordered sequence of strings; becomes a host-native `String[]`.
    StrArray(&'a [String]),
}

impl HostArg<'_> {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Bool(_) => Shape::Bool,
            Self::Int(_) => Shape::Int,
            Self::Float(_) => Shape::Float,
            Self::Str(_) => Shape::Str,
            Self::StrArray(_) => Shape::StrArray,
        }
    }
}

/// Value handed back by the host after a call.
///
/// Null strings and null string arrays come back empty; a null object
/// reference comes back as `Object(None)`.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue<O> {
    Void,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    StrArray(Vec<String>),
    Object(Option<O>),
}

impl<O> HostValue<O> {
    pub fn shape(&self) -> Shape {
        match self {
            Self::Void => Shape::Void,
            Self::Bool(_) => Shape::Bool,
            Self::Int(_) => Shape::Int,
            Self::Float(_) => Shape::Float,
            Self::Str(_) => Shape::Str,
            Self::StrArray(_) => Shape::StrArray,
            Self::Object(_) => Shape::Object,
        }
    }
}

/// A host runtime holding one application object.
///
/// Implementations must be usable from any native thread: the bridge calls
/// into them from whichever thread invokes a wrapper.
pub trait HostRuntime: Send + Sync {
    /// Resolved runtime type of the host object.
    type Class: Send + Sync;
    /// Resolved reference to one method on the class.
    type MethodRef: Copy + Send + Sync + fmt::Debug;
    /// Host object reference returned from a call (render view, activity).
    type Object: Send + Sync;

    /// Resolve the host object's class. Failure here is fatal to bridge
    /// construction.
    fn resolve_class(&self) -> Result<Self::Class>;

    /// Look up a method by name and type descriptor. `None` means the host
    /// build does not provide it.
    fn resolve_method(
        &self,
        class: &Self::Class,
        name: &str,
        descriptor: &str,
    ) -> Option<Self::MethodRef>;

    /// Invoke a resolved method on the host object and wait for it to
    /// return. The returned value must have the shape of `signature.ret()`.
    fn invoke(
        &self,
        method: Self::MethodRef,
        signature: &Signature,
        args: &[HostArg<'_>],
    ) -> Result<HostValue<Self::Object>>;
}
