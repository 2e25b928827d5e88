// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI host runtime.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The host object is the engine's Kotlin
// application object, handed to native code when the process starts.
//
// ## Architecture notes
//
// `JniHost` keeps the `JavaVM` and a global reference to the host object.
// Every call attaches the current thread permanently (no-op if it already is)
// and runs inside a local reference frame, so argument strings and arrays
// created for one call never leak into the caller's frame. Java exceptions
// raised by a lookup or call are cleared before returning; the bridge sees
// them as an unresolved method or a failed call.

#![cfg(target_os = "android")]

use jni::objects::{GlobalRef, JClass, JMethodID, JObject, JObjectArray, JString, JValue};
use jni::signature::{Primitive, ReturnType};
use jni::sys::{jsize, jvalue};
use jni::{JNIEnv, JavaVM};

use hostbridge_core::config::BridgeConfig;
use hostbridge_core::error::{BridgeError, Result};

use crate::bridge::HostBridge;
use crate::host::{HostArg, HostRuntime, HostValue};
use crate::signature::{Shape, Signature};

/// Local references one call may create: one per string argument plus the
/// elements of string arrays, which are released as they are copied.
const LOCAL_FRAME_CAPACITY: i32 = 16;

const STRING_CLASS: &str = "java/lang/String";

/// Convenience: map any `jni::errors::Error` into `BridgeError::Host`.
fn jni_err(context: &str, e: jni::errors::Error) -> BridgeError {
    BridgeError::Host(format!("{context}: {e}"))
}

/// Clear a pending Java exception so the thread can keep making JNI calls.
fn clear_pending_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

/// Host runtime backed by a JVM object.
pub struct JniHost {
    vm: JavaVM,
    instance: GlobalRef,
}

impl JniHost {
    /// Capture the VM and a global reference to `instance`.
    ///
    /// Called from the native entry point that receives the host object; the
    /// local reference passed in may be discarded afterwards.
    pub fn new(env: &mut JNIEnv<'_>, instance: &JObject<'_>) -> Result<Self> {
        if instance.is_null() {
            return Err(BridgeError::ClassUnavailable("host object is null".into()));
        }
        let vm = env
            .get_java_vm()
            .map_err(|e| BridgeError::Env(format!("failed to obtain JavaVM: {e}")))?;
        let instance = env
            .new_global_ref(instance)
            .map_err(|e| jni_err("new_global_ref(host)", e))?;
        Ok(Self { vm, instance })
    }

    fn env(&self) -> Result<JNIEnv<'_>> {
        self.vm
            .attach_current_thread_permanently()
            .map_err(|e| BridgeError::Env(format!("failed to attach JNI thread: {e}")))
    }
}

impl HostRuntime for JniHost {
    type Class = GlobalRef;
    type MethodRef = JMethodID;
    type Object = GlobalRef;

    fn resolve_class(&self) -> Result<GlobalRef> {
        let mut env = self.env()?;
        let class = env
            .get_object_class(&self.instance)
            .map_err(|e| BridgeError::ClassUnavailable(e.to_string()))?;
        env.new_global_ref(class)
            .map_err(|e| BridgeError::ClassUnavailable(e.to_string()))
    }

    fn resolve_method(
        &self,
        class: &GlobalRef,
        name: &str,
        descriptor: &str,
    ) -> Option<JMethodID> {
        let mut env = self.env().ok()?;
        let class = JClass::from(env.new_local_ref(class).ok()?);
        let method = match env.get_method_id(&class, name, descriptor) {
            Ok(method) => Some(method),
            Err(_) => {
                // NoSuchMethodError is expected for optional operations.
                clear_pending_exception(&mut env);
                None
            }
        };
        let _ = env.delete_local_ref(class);
        method
    }

    fn invoke(
        &self,
        method: JMethodID,
        signature: &Signature,
        args: &[HostArg<'_>],
    ) -> Result<HostValue<GlobalRef>> {
        let mut env = self.env()?;
        let instance = &self.instance;

        let outcome = env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| {
            call_in_frame(env, instance, method, signature, args)
        });

        outcome.map_err(|e| {
            clear_pending_exception(&mut env);
            jni_err("host call", e)
        })
    }
}

fn call_in_frame(
    env: &mut JNIEnv<'_>,
    instance: &GlobalRef,
    method: JMethodID,
    signature: &Signature,
    args: &[HostArg<'_>],
) -> jni::errors::Result<HostValue<GlobalRef>> {
    // Keeps argument objects alive until the call returns.
    let mut locals: Vec<JObject<'_>> = Vec::with_capacity(args.len());
    let mut raw: Vec<jvalue> = Vec::with_capacity(args.len());

    for arg in args {
        let value = match *arg {
            HostArg::Bool(v) => JValue::Bool(u8::from(v)).as_jni(),
            HostArg::Int(v) => JValue::Int(v).as_jni(),
            HostArg::Float(v) => JValue::Float(v).as_jni(),
            HostArg::Str(v) => {
                let obj = JObject::from(env.new_string(v)?);
                let value = JValue::Object(&obj).as_jni();
                locals.push(obj);
                value
            }
            HostArg::StrArray(items) => {
                let obj = JObject::from(new_string_array(env, items)?);
                let value = JValue::Object(&obj).as_jni();
                locals.push(obj);
                value
            }
        };
        raw.push(value);
    }

    // SAFETY: `method` was resolved on the host object's class with the
    // descriptor `signature` was parsed from, and the bridge checked that
    // `args` match its parameter shapes.
    let result = unsafe {
        env.call_method_unchecked(instance, method, return_type(signature.ret()), &raw)
    }?;

    let value = match signature.ret() {
        Shape::Void => HostValue::Void,
        Shape::Bool => HostValue::Bool(result.z()?),
        Shape::Int => HostValue::Int(result.i()?),
        Shape::Float => HostValue::Float(result.f()?),
        Shape::Str => HostValue::Str(read_string(env, result.l()?)?),
        Shape::StrArray => HostValue::StrArray(read_string_array(env, result.l()?)?),
        Shape::Object => {
            let obj = result.l()?;
            if obj.is_null() {
                HostValue::Object(None)
            } else {
                HostValue::Object(Some(env.new_global_ref(obj)?))
            }
        }
    };
    Ok(value)
}

fn return_type(shape: Shape) -> ReturnType {
    match shape {
        Shape::Void => ReturnType::Primitive(Primitive::Void),
        Shape::Bool => ReturnType::Primitive(Primitive::Boolean),
        Shape::Int => ReturnType::Primitive(Primitive::Int),
        Shape::Float => ReturnType::Primitive(Primitive::Float),
        Shape::Str | Shape::Object => ReturnType::Object,
        Shape::StrArray => ReturnType::Array,
    }
}

fn new_string_array<'local>(
    env: &mut JNIEnv<'local>,
    items: &[String],
) -> jni::errors::Result<JObjectArray<'local>> {
    let array = env.new_object_array(items.len() as jsize, STRING_CLASS, JObject::null())?;
    for (i, item) in items.iter().enumerate() {
        let element = env.new_string(item)?;
        env.set_object_array_element(&array, i as jsize, &element)?;
        env.delete_local_ref(element)?;
    }
    Ok(array)
}

fn read_string(env: &mut JNIEnv<'_>, obj: JObject<'_>) -> jni::errors::Result<String> {
    if obj.is_null() {
        return Ok(String::new());
    }
    let string = JString::from(obj);
    let value: String = env.get_string(&string)?.into();
    env.delete_local_ref(string)?;
    Ok(value)
}

fn read_string_array(
    env: &mut JNIEnv<'_>,
    obj: JObject<'_>,
) -> jni::errors::Result<Vec<String>> {
    if obj.is_null() {
        return Ok(Vec::new());
    }
    let array = JObjectArray::from(obj);
    let len = env.get_array_length(&array)?;
    let mut out = Vec::with_capacity(len.max(0) as usize);
    for i in 0..len {
        let element = env.get_object_array_element(&array, i)?;
        let value = read_string(env, element)?;
        out.push(value);
    }
    Ok(out)
}

/// Build a bridge over the host object passed to a native entry point.
pub fn android_bridge(
    env: &mut JNIEnv<'_>,
    instance: &JObject<'_>,
    config: &BridgeConfig,
) -> Result<HostBridge<JniHost>> {
    tracing::info!("Android: creating host bridge");
    HostBridge::new(JniHost::new(env, instance)?, config)
}
