// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsed form of a JVM method descriptor, reduced to the value shapes the
// bridge knows how to marshal.

use std::fmt;

use serde::Serialize;

use hostbridge_core::error::{BridgeError, Result};

const STRING_CLASS: &str = "java/lang/String";

/// Kind of value in a parameter or return position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Void,
    Bool,
    Int,
    Float,
    Str,
    StrArray,
    /// Any reference type other than `String` (views, activities, ...).
    Object,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Void => "void",
            Self::Bool => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "String",
            Self::StrArray => "String[]",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// Parameter and return shapes of one host method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Shape>,
    ret: Shape,
}

impl Signature {
    /// Parse a descriptor such as `(Ljava/lang/String;I)Z`.
    ///
    /// Only the types the bridge can marshal are accepted: `Z`, `I`, `F`,
    /// `V` (return position only), `String`, `String[]` and other object
    /// references.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let body = descriptor
            .strip_prefix('(')
            .ok_or_else(|| invalid(descriptor, "missing `(`"))?;
        let (mut params_raw, ret_raw) = body
            .split_once(')')
            .ok_or_else(|| invalid(descriptor, "missing `)`"))?;

        let mut params = Vec::new();
        while !params_raw.is_empty() {
            let (shape, tail) = next_shape(params_raw, descriptor)?;
            if shape == Shape::Void {
                return Err(invalid(descriptor, "void parameter"));
            }
            params.push(shape);
            params_raw = tail;
        }

        let (ret, tail) = next_shape(ret_raw, descriptor)?;
        if !tail.is_empty() {
            return Err(invalid(descriptor, "trailing characters after return type"));
        }

        Ok(Self { params, ret })
    }

    pub fn params(&self) -> &[Shape] {
        &self.params
    }

    pub fn ret(&self) -> Shape {
        self.ret
    }
}

fn next_shape<'a>(input: &'a str, descriptor: &str) -> Result<(Shape, &'a str)> {
    let mut chars = input.chars();
    let Some(tag) = chars.next() else {
        return Err(invalid(descriptor, "unexpected end of descriptor"));
    };
    let tail = chars.as_str();

    match tag {
        'V' => Ok((Shape::Void, tail)),
        'Z' => Ok((Shape::Bool, tail)),
        'I' => Ok((Shape::Int, tail)),
        'F' => Ok((Shape::Float, tail)),
        'L' => {
            let end = tail
                .find(';')
                .ok_or_else(|| invalid(descriptor, "unterminated class name"))?;
            let class = &tail[..end];
            if class.is_empty() {
                return Err(invalid(descriptor, "empty class name"));
            }
            let shape = if class == STRING_CLASS {
                Shape::Str
            } else {
                Shape::Object
            };
            Ok((shape, &tail[end + 1..]))
        }
        '[' => match next_shape(tail, descriptor)? {
            (Shape::Str, rest) => Ok((Shape::StrArray, rest)),
            (other, _) => Err(invalid(
                descriptor,
                &format!("arrays of {other} cannot be marshaled"),
            )),
        },
        other => Err(invalid(
            descriptor,
            &format!("type `{other}` cannot be marshaled"),
        )),
    }
}

fn invalid(descriptor: &str, reason: &str) -> BridgeError {
    BridgeError::Signature(format!("{descriptor}: {reason}"))
}
