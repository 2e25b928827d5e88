// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native-host bridge: typed native calls over a resolved operation table.
//
// ## Failure policy
//
// Construction is the only place the bridge fails hard: a missing host class
// or a missing operation listed in `BridgeConfig::required_operations`
// aborts it. After that, every wrapper returns a plain value:
//
// - unresolved operation: the documented default (`false`, empty, transparent
//   color, `0`, `ErrorCode::Unsupported`) and no host call at all;
// - the host raised: logged at error level, same default, or
//   `ErrorCode::Failed` for wrappers returning a code;
// - argument/result shape disagrees with the declared signature: panics in
//   debug builds, logged and treated as a host failure in release builds.
//
// UI wrappers (`show_dialog`, `show_input_dialog`, `show_file_picker`) only
// ask the host to present something. The user's answer comes back through the
// host's own callback path, which this bridge does not handle.

use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::{error, info, trace, warn};

use hostbridge_core::config::BridgeConfig;
use hostbridge_core::error::{BridgeError, Result};
use hostbridge_core::operation::Operation;
use hostbridge_core::types::{Color, ErrorCode, FilePickerMode};

use crate::host::{HostArg, HostRuntime, HostValue};
use crate::signature::Shape;
use crate::table::{CapabilityReport, OperationTable};
use crate::view::ViewBridge;

/// What happened to one dispatched call.
enum Outcome<O> {
    /// The operation is not resolved; the host was not touched.
    Unresolved,
    /// The host raised, or the call broke the marshaling contract.
    Failed,
    Returned(HostValue<O>),
}

/// Bridge to one host application object.
///
/// Holds the host handle, its class and the resolved operation table for the
/// lifetime of the value; everything is released on drop. Reads need no
/// locking, so a shared reference can be used from any number of native
/// threads.
pub struct HostBridge<H: HostRuntime> {
    // Field order is drop order: the view goes before the host handle.
    view: OnceLock<ViewBridge<H::Object>>,
    view_init: Mutex<()>,
    table: OperationTable<H::MethodRef>,
    _class: H::Class,
    host: H,
}

impl<H: HostRuntime> HostBridge<H> {
    /// Resolve the host class and every catalog operation.
    pub fn new(host: H, config: &BridgeConfig) -> Result<Self> {
        let class = host.resolve_class()?;
        let table = OperationTable::resolve(&host, &class, config.log_unresolved)?;

        if let Some(missing) = config
            .required_operations
            .iter()
            .find(|op| !table.is_resolved(**op))
        {
            warn!(operation = %missing, "required host operation is missing");
            return Err(BridgeError::MissingOperation(missing.host_name().into()));
        }

        info!(
            resolved = table.resolved_count(),
            total = Operation::ALL.len(),
            "host bridge ready"
        );

        Ok(Self {
            view: OnceLock::new(),
            view_init: Mutex::new(()),
            table,
            _class: class,
            host,
        })
    }

    /// The host runtime this bridge calls into.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether the host build provides `op`.
    pub fn supports(&self, op: Operation) -> bool {
        self.table.is_resolved(op)
    }

    pub fn capability_report(&self) -> CapabilityReport {
        self.table.report()
    }

    // -- Dispatch -----------------------------------------------------------

    fn call(&self, op: Operation, expect: Shape, args: &[HostArg<'_>]) -> Outcome<H::Object> {
        let Some(entry) = self.table.get(op) else {
            return Outcome::Unresolved;
        };

        let declared = entry.signature.params();
        let matches = declared.iter().copied().eq(args.iter().map(HostArg::shape));
        if entry.signature.ret() != expect || !matches {
            let passed: Vec<Shape> = args.iter().map(HostArg::shape).collect();
            marshal_mismatch(
                op,
                format!(
                    "declared {declared:?} -> {}, called with {passed:?} -> {expect}",
                    entry.signature.ret()
                ),
            );
            return Outcome::Failed;
        }

        trace!(operation = %op, "dispatching to host");
        match self.host.invoke(entry.method, &entry.signature, args) {
            Ok(value) if value.shape() == expect => Outcome::Returned(value),
            Ok(value) => {
                marshal_mismatch(
                    op,
                    format!("host returned {} where {expect} was declared", value.shape()),
                );
                Outcome::Failed
            }
            Err(e) => {
                error!(operation = %op, error = %e, "host call failed");
                Outcome::Failed
            }
        }
    }

    fn call_void(&self, op: Operation, args: &[HostArg<'_>]) {
        let _ = self.call(op, Shape::Void, args);
    }

    fn call_bool(&self, op: Operation, args: &[HostArg<'_>]) -> bool {
        match self.call(op, Shape::Bool, args) {
            Outcome::Returned(HostValue::Bool(v)) => v,
            _ => false,
        }
    }

    fn call_int(&self, op: Operation, args: &[HostArg<'_>]) -> Option<i32> {
        match self.call(op, Shape::Int, args) {
            Outcome::Returned(HostValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    fn call_string(&self, op: Operation, args: &[HostArg<'_>]) -> String {
        match self.call(op, Shape::Str, args) {
            Outcome::Returned(HostValue::Str(v)) => v,
            _ => String::new(),
        }
    }

    fn call_strings(&self, op: Operation, args: &[HostArg<'_>]) -> Vec<String> {
        match self.call(op, Shape::StrArray, args) {
            Outcome::Returned(HostValue::StrArray(v)) => v,
            _ => Vec::new(),
        }
    }

    fn call_color(&self, op: Operation) -> Color {
        self.call_int(op, &[])
            .map_or(Color::TRANSPARENT, Color::from_argb)
    }

    /// Operations whose result is an engine error code.
    fn call_code(&self, op: Operation, args: &[HostArg<'_>]) -> ErrorCode {
        match self.call(op, Shape::Int, args) {
            Outcome::Unresolved => ErrorCode::Unsupported,
            Outcome::Failed => ErrorCode::Failed,
            Outcome::Returned(HostValue::Int(code)) => ErrorCode::from_host(code),
            Outcome::Returned(_) => ErrorCode::Failed,
        }
    }

    /// Void UI operations: `Ok` means the host accepted the request.
    fn dispatch_ui(&self, op: Operation, args: &[HostArg<'_>]) -> ErrorCode {
        match self.call(op, Shape::Void, args) {
            Outcome::Unresolved => ErrorCode::Unsupported,
            Outcome::Failed => ErrorCode::Failed,
            Outcome::Returned(_) => ErrorCode::Ok,
        }
    }

    // -- View bridge --------------------------------------------------------

    /// The host render view, fetched from the host on first access and cached.
    ///
    /// Concurrent first accesses result in a single host call; every caller
    /// gets the same instance. A failed fetch caches nothing, so the next
    /// access asks the host again. A host build without "get render view"
    /// fails every time.
    pub fn view(&self) -> Result<&ViewBridge<H::Object>> {
        if let Some(view) = self.view.get() {
            return Ok(view);
        }

        let op = Operation::GetRenderView;
        let Some(entry) = self.table.get(op) else {
            return Err(BridgeError::MissingOperation(op.host_name().into()));
        };

        let _guard = self.view_init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(view) = self.view.get() {
            return Ok(view);
        }

        let handle = match self.host.invoke(entry.method, &entry.signature, &[]) {
            Ok(HostValue::Object(Some(handle))) => handle,
            Ok(HostValue::Object(None)) => {
                warn!("host returned a null render view");
                return Err(BridgeError::NullView);
            }
            Ok(other) => {
                let detail = format!("host returned {} where object was declared", other.shape());
                marshal_mismatch(op, detail.clone());
                return Err(BridgeError::Marshal {
                    operation: op.host_name().into(),
                    detail,
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch render view");
                return Err(e);
            }
        };

        info!("render view bridge created");
        Ok(self.view.get_or_init(|| ViewBridge::new(handle)))
    }

    // -- Lifecycle ----------------------------------------------------------

    pub fn on_setup_completed(&self) {
        self.call_void(Operation::OnSetupCompleted, &[]);
    }

    pub fn on_main_loop_started(&self) {
        self.call_void(Operation::OnMainLoopStarted, &[]);
    }

    pub fn on_terminating(&self) {
        self.call_void(Operation::OnTerminating, &[]);
    }

    pub fn restart(&self) {
        self.call_void(Operation::Restart, &[]);
    }

    /// Ask the host to shut down the instance `instance_id` (`0` is this one).
    pub fn force_quit(&self, instance_id: i32) -> bool {
        self.call_bool(Operation::ForceQuit, &[HostArg::Int(instance_id)])
    }

    /// Start another engine instance with the given command line.
    /// Returns the host's id for it, or `0` if none was started.
    pub fn create_new_instance(&self, args: &[String]) -> i32 {
        self.call_int(Operation::CreateNewInstance, &[HostArg::StrArray(args)])
            .unwrap_or(0)
    }

    // -- Display ------------------------------------------------------------

    pub fn set_keep_screen_on(&self, enabled: bool) {
        self.call_void(Operation::SetKeepScreenOn, &[HostArg::Bool(enabled)]);
    }

    pub fn is_dark_mode_supported(&self) -> bool {
        self.call_bool(Operation::IsDarkModeSupported, &[])
    }

    pub fn is_dark_mode(&self) -> bool {
        self.call_bool(Operation::IsDarkMode, &[])
    }

    pub fn accent_color(&self) -> Color {
        self.call_color(Operation::GetAccentColor)
    }

    pub fn base_color(&self) -> Color {
        self.call_color(Operation::GetBaseColor)
    }

    pub fn enable_immersive_mode(&self, enabled: bool) {
        self.call_void(Operation::EnableImmersiveMode, &[HostArg::Bool(enabled)]);
    }

    pub fn is_in_immersive_mode(&self) -> bool {
        self.call_bool(Operation::IsInImmersiveMode, &[])
    }

    /// Host activity object, when the host exposes one.
    pub fn activity(&self) -> Option<H::Object> {
        match self.call(Operation::GetActivity, Shape::Object, &[]) {
            Outcome::Returned(HostValue::Object(activity)) => activity,
            _ => None,
        }
    }

    // -- Clipboard ----------------------------------------------------------

    pub fn clipboard(&self) -> String {
        self.call_string(Operation::GetClipboard, &[])
    }

    pub fn set_clipboard(&self, text: &str) {
        self.call_void(Operation::SetClipboard, &[HostArg::Str(text)]);
    }

    pub fn has_clipboard(&self) -> bool {
        self.call_bool(Operation::HasClipboard, &[])
    }

    // -- Dialogs ------------------------------------------------------------

    pub fn alert(&self, message: &str, title: &str) {
        self.call_void(Operation::Alert, &[HostArg::Str(message), HostArg::Str(title)]);
    }

    pub fn show_dialog(&self, title: &str, description: &str, buttons: &[String]) -> ErrorCode {
        self.dispatch_ui(
            Operation::ShowDialog,
            &[
                HostArg::Str(title),
                HostArg::Str(description),
                HostArg::StrArray(buttons),
            ],
        )
    }

    pub fn show_input_dialog(&self, title: &str, message: &str, existing_text: &str) -> ErrorCode {
        self.dispatch_ui(
            Operation::ShowInputDialog,
            &[
                HostArg::Str(title),
                HostArg::Str(message),
                HostArg::Str(existing_text),
            ],
        )
    }

    pub fn show_file_picker(
        &self,
        current_directory: &str,
        filename: &str,
        mode: FilePickerMode,
        filters: &[String],
    ) -> ErrorCode {
        self.dispatch_ui(
            Operation::ShowFilePicker,
            &[
                HostArg::Str(current_directory),
                HostArg::Str(filename),
                HostArg::Int(mode.host_value()),
                HostArg::StrArray(filters),
            ],
        )
    }

    // -- Permissions --------------------------------------------------------

    /// Ask for one permission. `true` means it is already granted; otherwise
    /// the grant result arrives later through the host callback path.
    pub fn request_permission(&self, name: &str) -> bool {
        self.call_bool(Operation::RequestPermission, &[HostArg::Str(name)])
    }

    pub fn request_permissions(&self) -> bool {
        self.call_bool(Operation::RequestPermissions, &[])
    }

    pub fn granted_permissions(&self) -> Vec<String> {
        self.call_strings(Operation::GetGrantedPermissions, &[])
    }

    // -- Platform data ------------------------------------------------------

    pub fn gdextension_config_files(&self) -> Vec<String> {
        self.call_strings(Operation::GetGdextensionConfigFiles, &[])
    }

    /// PEM bundle of the system CA certificates.
    pub fn ca_certificates(&self) -> String {
        self.call_string(Operation::GetCaCertificates, &[])
    }

    pub fn init_input_devices(&self) {
        self.call_void(Operation::InitInputDevices, &[]);
    }

    /// Vibrate for `duration_ms`. A negative `amplitude` uses the device
    /// default strength.
    pub fn vibrate(&self, duration_ms: i32, amplitude: f32) {
        self.call_void(
            Operation::Vibrate,
            &[HostArg::Int(duration_ms), HostArg::Float(amplitude)],
        );
    }

    pub fn input_fallback_mapping(&self) -> String {
        self.call_string(Operation::GetInputFallbackMapping, &[])
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.call_bool(Operation::HasFeature, &[HostArg::Str(feature)])
    }

    // -- Benchmarking -------------------------------------------------------

    /// Open a measurement. Matching it with [`end_benchmark_measure`] is the
    /// caller's job; each half is forwarded on its own.
    ///
    /// [`end_benchmark_measure`]: Self::end_benchmark_measure
    pub fn begin_benchmark_measure(&self, context: &str, label: &str) {
        self.call_void(
            Operation::BeginBenchmarkMeasure,
            &[HostArg::Str(context), HostArg::Str(label)],
        );
    }

    pub fn end_benchmark_measure(&self, context: &str, label: &str) {
        self.call_void(
            Operation::EndBenchmarkMeasure,
            &[HostArg::Str(context), HostArg::Str(label)],
        );
    }

    pub fn dump_benchmark(&self, benchmark_file: &str) {
        self.call_void(Operation::DumpBenchmark, &[HostArg::Str(benchmark_file)]);
    }

    // -- Editor -------------------------------------------------------------

    pub fn sign_apk(
        &self,
        input_path: &str,
        output_path: &str,
        keystore_path: &str,
        keystore_user: &str,
        keystore_password: &str,
    ) -> ErrorCode {
        self.call_code(
            Operation::SignApk,
            &[
                HostArg::Str(input_path),
                HostArg::Str(output_path),
                HostArg::Str(keystore_path),
                HostArg::Str(keystore_user),
                HostArg::Str(keystore_password),
            ],
        )
    }

    pub fn verify_apk(&self, apk_path: &str) -> ErrorCode {
        self.call_code(Operation::VerifyApk, &[HostArg::Str(apk_path)])
    }

    pub fn on_editor_workspace_selected(&self, workspace: &str) {
        self.call_void(
            Operation::OnEditorWorkspaceSelected,
            &[HostArg::Str(workspace)],
        );
    }
}

macro_rules! capability_queries {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        impl<H: HostRuntime> HostBridge<H> {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> bool {
                    self.supports(Operation::$op)
                }
            )*
        }
    };
}

capability_queries! {
    has_force_quit => ForceQuit;
    /// Whether the host can report dark-mode support at all.
    has_dark_mode_supported => IsDarkModeSupported;
    has_dark_mode => IsDarkMode;
    has_accent_color => GetAccentColor;
    has_base_color => GetBaseColor;
    has_get_clipboard => GetClipboard;
    has_set_clipboard => SetClipboard;
    has_has_clipboard => HasClipboard;
    has_show_dialog => ShowDialog;
    has_show_input_dialog => ShowInputDialog;
    has_show_file_picker => ShowFilePicker;
    has_request_permission => RequestPermission;
    has_request_permissions => RequestPermissions;
    has_granted_permissions => GetGrantedPermissions;
    has_gdextension_config_files => GetGdextensionConfigFiles;
    has_ca_certificates => GetCaCertificates;
    has_input_fallback_mapping => GetInputFallbackMapping;
    has_create_new_instance => CreateNewInstance;
    has_render_view => GetRenderView;
    has_has_feature => HasFeature;
    has_sign_apk => SignApk;
    has_verify_apk => VerifyApk;
    has_immersive_mode => EnableImmersiveMode;
    has_in_immersive_mode => IsInImmersiveMode;
    /// Whether the host wants to hear about editor workspace switches.
    has_editor_workspace_hook => OnEditorWorkspaceSelected;
    has_activity => GetActivity;
}

impl<H: HostRuntime> Drop for HostBridge<H> {
    fn drop(&mut self) {
        tracing::debug!("releasing host bridge");
    }
}

/// Shape disagreement between a wrapper and its declared signature. The
/// signatures are fixed at build time, so this is a programming error.
fn marshal_mismatch(op: Operation, detail: String) {
    let err = BridgeError::Marshal {
        operation: op.host_name().into(),
        detail,
    };
    error!(%err, "marshaling contract violated");
    if cfg!(debug_assertions) {
        panic!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::time::Duration;

    use hostbridge_core::operation::OperationKind;

    use crate::stub::{RecordedArg, StubHost, StubResponse};

    fn bridge(host: StubHost) -> HostBridge<StubHost> {
        HostBridge::new(host, &BridgeConfig::default()).unwrap()
    }

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    /// Call the wrapper for `op` with throwaway arguments.
    fn exercise(b: &HostBridge<StubHost>, op: Operation) {
        let list = strs(&["a"]);
        match op {
            Operation::Restart => b.restart(),
            Operation::ForceQuit => assert!(!b.force_quit(0)),
            Operation::SetKeepScreenOn => b.set_keep_screen_on(true),
            Operation::Alert => b.alert("m", "t"),
            Operation::IsDarkModeSupported => assert!(!b.is_dark_mode_supported()),
            Operation::IsDarkMode => assert!(!b.is_dark_mode()),
            Operation::GetAccentColor => assert_eq!(b.accent_color(), Color::TRANSPARENT),
            Operation::GetBaseColor => assert_eq!(b.base_color(), Color::TRANSPARENT),
            Operation::GetClipboard => assert_eq!(b.clipboard(), ""),
            Operation::SetClipboard => b.set_clipboard("x"),
            Operation::HasClipboard => assert!(!b.has_clipboard()),
            Operation::ShowDialog => {
                assert_eq!(b.show_dialog("t", "d", &list), ErrorCode::Unsupported)
            }
            Operation::ShowInputDialog => {
                assert_eq!(b.show_input_dialog("t", "m", ""), ErrorCode::Unsupported)
            }
            Operation::ShowFilePicker => assert_eq!(
                b.show_file_picker("/", "f", FilePickerMode::OpenFile, &list),
                ErrorCode::Unsupported
            ),
            Operation::RequestPermission => assert!(!b.request_permission("CAMERA")),
            Operation::RequestPermissions => assert!(!b.request_permissions()),
            Operation::GetGrantedPermissions => assert!(b.granted_permissions().is_empty()),
            Operation::GetGdextensionConfigFiles => {
                assert!(b.gdextension_config_files().is_empty())
            }
            Operation::GetCaCertificates => assert_eq!(b.ca_certificates(), ""),
            Operation::InitInputDevices => b.init_input_devices(),
            Operation::Vibrate => b.vibrate(10, -1.0),
            Operation::GetInputFallbackMapping => assert_eq!(b.input_fallback_mapping(), ""),
            Operation::OnSetupCompleted => b.on_setup_completed(),
            Operation::OnMainLoopStarted => b.on_main_loop_started(),
            Operation::OnTerminating => b.on_terminating(),
            Operation::CreateNewInstance => assert_eq!(b.create_new_instance(&list), 0),
            Operation::GetRenderView => assert!(b.view().is_err()),
            Operation::BeginBenchmarkMeasure => b.begin_benchmark_measure("c", "l"),
            Operation::EndBenchmarkMeasure => b.end_benchmark_measure("c", "l"),
            Operation::DumpBenchmark => b.dump_benchmark("bench.json"),
            Operation::HasFeature => assert!(!b.has_feature("vulkan")),
            Operation::SignApk => {
                assert_eq!(b.sign_apk("i", "o", "k", "u", "p"), ErrorCode::Unsupported)
            }
            Operation::VerifyApk => assert_eq!(b.verify_apk("a.apk"), ErrorCode::Unsupported),
            Operation::EnableImmersiveMode => b.enable_immersive_mode(true),
            Operation::IsInImmersiveMode => assert!(!b.is_in_immersive_mode()),
            Operation::OnEditorWorkspaceSelected => b.on_editor_workspace_selected("2D"),
            Operation::GetActivity => assert!(b.activity().is_none()),
        }
    }

    #[test]
    fn absent_operations_return_defaults_without_calling_host() {
        for op in Operation::ALL {
            let b = bridge(StubHost::full().without(op));
            assert!(!b.supports(op), "{op}");
            exercise(&b, op);
            assert_eq!(b.host().invocation_count(op), 0, "{op} reached the host");
        }
    }

    #[test]
    fn empty_host_never_sees_a_call() {
        let b = bridge(StubHost::empty());
        for op in Operation::ALL {
            exercise(&b, op);
        }
        assert!(b.host().calls().is_empty());
    }

    #[test]
    fn capability_queries_follow_resolution() {
        let b = bridge(
            StubHost::full()
                .without(Operation::GetAccentColor)
                .without(Operation::IsDarkMode)
                .without(Operation::EnableImmersiveMode)
                .without(Operation::OnEditorWorkspaceSelected),
        );
        assert!(!b.has_accent_color());
        assert!(!b.has_dark_mode());
        assert!(!b.has_immersive_mode());
        assert!(!b.has_editor_workspace_hook());

        assert!(b.has_base_color());
        assert!(b.has_dark_mode_supported());
        assert!(b.has_get_clipboard());
        assert!(b.has_set_clipboard());
        assert!(b.has_has_clipboard());
        assert!(b.has_in_immersive_mode());
        assert!(b.has_render_view());
        assert!(b.has_sign_apk());
    }

    #[test]
    fn capability_queries_do_not_call_host() {
        let b = bridge(StubHost::full());
        assert!(b.has_get_clipboard());
        assert!(b.has_activity());
        assert!(b.host().calls().is_empty());
    }

    #[test]
    fn resolution_happens_once_per_bridge() {
        let b = bridge(
            StubHost::full()
                .respond(Operation::GetClipboard, StubResponse::Str("x".into()))
                .respond(Operation::IsDarkMode, StubResponse::Bool(true)),
        );
        for _ in 0..5 {
            assert_eq!(b.clipboard(), "x");
            assert!(b.is_dark_mode());
            b.vibrate(5, 0.5);
        }
        let _ = b.view().unwrap();

        for op in Operation::ALL {
            assert_eq!(b.host().resolution_count(op), 1, "{op}");
        }
        assert_eq!(b.host().invocation_count(Operation::GetClipboard), 5);
    }

    #[test]
    fn missing_class_is_fatal() {
        let result = HostBridge::new(StubHost::full().without_class(), &BridgeConfig::default());
        assert!(matches!(result, Err(BridgeError::ClassUnavailable(_))));
    }

    #[test]
    fn missing_required_operation_is_fatal() {
        let config = BridgeConfig {
            required_operations: vec![Operation::GetRenderView, Operation::SignApk],
            ..BridgeConfig::default()
        };
        let result = HostBridge::new(StubHost::full().without(Operation::SignApk), &config);
        match result {
            Err(BridgeError::MissingOperation(name)) => assert_eq!(name, "nativeSignApk"),
            other => panic!("expected MissingOperation, got {:?}", other.err()),
        }

        assert!(HostBridge::new(StubHost::full(), &config).is_ok());
    }

    #[test]
    fn missing_optional_operations_do_not_abort_construction() {
        let b = bridge(StubHost::empty());
        let report = b.capability_report();
        assert_eq!(report.resolved, 0);
        assert!(
            report
                .entries
                .iter()
                .any(|e| e.kind == OperationKind::Capability && !e.resolved)
        );
    }

    #[test]
    fn view_is_created_once_under_contention() {
        const THREADS: usize = 8;
        let b = bridge(StubHost::full().with_view_delay(Duration::from_millis(20)));
        let barrier = Barrier::new(THREADS);
        let (b, barrier) = (&b, &barrier);

        let ids: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(move || {
                        barrier.wait();
                        let view = b.view().unwrap();
                        view as *const ViewBridge<_> as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(b.host().invocation_count(Operation::GetRenderView), 1);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn view_is_cached_after_first_access() {
        let b = bridge(StubHost::full());
        let first = b.view().unwrap().handle().id;
        let second = b.view().unwrap().handle().id;
        assert_eq!(first, second);
        assert_eq!(b.host().invocation_count(Operation::GetRenderView), 1);
    }

    #[test]
    fn missing_render_view_is_fatal_for_accessor() {
        let b = bridge(StubHost::full().without(Operation::GetRenderView));
        assert!(matches!(b.view(), Err(BridgeError::MissingOperation(_))));
        assert!(matches!(b.view(), Err(BridgeError::MissingOperation(_))));
    }

    #[test]
    fn null_render_view_is_not_cached() {
        let b = bridge(StubHost::full().respond(Operation::GetRenderView, StubResponse::Null));
        assert!(matches!(b.view(), Err(BridgeError::NullView)));
        assert!(matches!(b.view(), Err(BridgeError::NullView)));
        assert_eq!(b.host().invocation_count(Operation::GetRenderView), 2);
    }

    #[test]
    fn create_new_instance_preserves_argument_order() {
        let b = bridge(
            StubHost::full().respond(Operation::CreateNewInstance, StubResponse::Int(42)),
        );
        let args = strs(&["--foo", "--path", "/tmp/project", "--editor"]);

        assert_eq!(b.create_new_instance(&strs(&["--foo"])), 42);
        assert_eq!(b.create_new_instance(&args), 42);

        let calls = b.host().calls_to(Operation::CreateNewInstance);
        assert_eq!(calls[0], vec![RecordedArg::StrArray(strs(&["--foo"]))]);
        assert_eq!(calls[1], vec![RecordedArg::StrArray(args)]);
    }

    #[test]
    fn sign_apk_reports_host_outcome() {
        let ok = bridge(StubHost::full().respond(Operation::SignApk, StubResponse::Int(0)));
        assert_eq!(
            ok.sign_apk("in.apk", "out.apk", "debug.keystore", "android", "secret"),
            ErrorCode::Ok
        );
        assert_eq!(
            ok.host().calls_to(Operation::SignApk)[0],
            vec![
                RecordedArg::Str("in.apk".into()),
                RecordedArg::Str("out.apk".into()),
                RecordedArg::Str("debug.keystore".into()),
                RecordedArg::Str("android".into()),
                RecordedArg::Str("secret".into()),
            ]
        );

        let failing = bridge(StubHost::full().respond(Operation::SignApk, StubResponse::Int(1)));
        let code = failing.sign_apk("in.apk", "out.apk", "debug.keystore", "android", "bad");
        assert!(!code.is_ok());
        assert_eq!(code, ErrorCode::Failed);

        let missing_keystore =
            bridge(StubHost::full().respond(Operation::SignApk, StubResponse::Int(7)));
        assert_eq!(
            missing_keystore.sign_apk("in.apk", "out.apk", "gone.keystore", "u", "p"),
            ErrorCode::Io
        );
    }

    #[test]
    fn raising_host_call_becomes_failed_code() {
        let b = bridge(
            StubHost::full()
                .respond(Operation::VerifyApk, StubResponse::Fail("SecurityException".into()))
                .respond(Operation::ShowDialog, StubResponse::Fail("BadTokenException".into()))
                .respond(Operation::GetClipboard, StubResponse::Fail("boom".into())),
        );
        assert_eq!(b.verify_apk("a.apk"), ErrorCode::Failed);
        assert_eq!(b.show_dialog("t", "d", &[]), ErrorCode::Failed);
        assert_eq!(b.clipboard(), "");
    }

    #[test]
    fn benchmark_halves_are_forwarded_independently() {
        let b = bridge(StubHost::full());
        b.begin_benchmark_measure("ctx", "label");
        b.end_benchmark_measure("ctx", "label");
        // out of order and unmatched: still forwarded
        b.end_benchmark_measure("ctx", "orphan");
        b.begin_benchmark_measure("other", "never-ended");

        let pair = |c: &str, l: &str| vec![RecordedArg::Str(c.into()), RecordedArg::Str(l.into())];
        assert_eq!(
            b.host().calls_to(Operation::BeginBenchmarkMeasure),
            vec![pair("ctx", "label"), pair("other", "never-ended")]
        );
        assert_eq!(
            b.host().calls_to(Operation::EndBenchmarkMeasure),
            vec![pair("ctx", "label"), pair("ctx", "orphan")]
        );
    }

    #[test]
    fn lifecycle_notifications_are_silent_without_host_support() {
        let b = bridge(
            StubHost::full()
                .without(Operation::OnSetupCompleted)
                .without(Operation::OnMainLoopStarted)
                .without(Operation::OnTerminating),
        );
        b.on_setup_completed();
        b.on_main_loop_started();
        b.on_terminating();
        assert!(b.host().calls().is_empty());
    }

    #[test]
    fn lifecycle_notifications_reach_host() {
        let b = bridge(StubHost::full());
        b.on_setup_completed();
        b.on_main_loop_started();
        b.on_terminating();
        let ops: Vec<_> = b.host().calls().iter().map(|c| c.operation).collect();
        assert_eq!(
            ops,
            vec![
                Operation::OnSetupCompleted,
                Operation::OnMainLoopStarted,
                Operation::OnTerminating
            ]
        );
    }

    #[test]
    fn colors_are_converted_from_argb() {
        let b = bridge(
            StubHost::full().respond(
                Operation::GetAccentColor,
                StubResponse::Int(0xFF00_80FF_u32 as i32),
            ),
        );
        let c = b.accent_color();
        assert_eq!(c.a, 1.0);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(c.b, 1.0);
    }

    #[test]
    fn ui_dispatch_marshals_arguments() {
        let b = bridge(StubHost::full());
        let filters = strs(&["*.png", "*.jpg"]);
        assert_eq!(
            b.show_file_picker("/sdcard", "shot.png", FilePickerMode::SaveFile, &filters),
            ErrorCode::Ok
        );
        assert_eq!(b.show_input_dialog("Name", "Enter a name", "player"), ErrorCode::Ok);

        assert_eq!(
            b.host().calls_to(Operation::ShowFilePicker)[0],
            vec![
                RecordedArg::Str("/sdcard".into()),
                RecordedArg::Str("shot.png".into()),
                RecordedArg::Int(4),
                RecordedArg::StrArray(filters),
            ]
        );
    }

    #[test]
    fn vibrate_passes_duration_and_amplitude() {
        let b = bridge(StubHost::full());
        b.vibrate(250, -1.0);
        assert_eq!(
            b.host().calls_to(Operation::Vibrate),
            vec![vec![RecordedArg::Int(250), RecordedArg::Float(-1.0)]]
        );
    }

    #[test]
    fn string_lists_come_back_in_host_order() {
        let granted = strs(&["android.permission.CAMERA", "android.permission.RECORD_AUDIO"]);
        let b = bridge(
            StubHost::full()
                .respond(Operation::GetGrantedPermissions, StubResponse::StrArray(granted.clone())),
        );
        assert_eq!(b.granted_permissions(), granted);
    }

    #[test]
    fn activity_is_returned_when_present() {
        let b = bridge(StubHost::full());
        assert!(b.activity().is_some());

        let b = bridge(StubHost::full().respond(Operation::GetActivity, StubResponse::Null));
        assert!(b.activity().is_none());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "marshaling mismatch")]
    fn wrong_result_shape_fails_loudly_in_debug() {
        let b = bridge(
            StubHost::full().respond(Operation::IsDarkMode, StubResponse::Str("yes".into())),
        );
        let _ = b.is_dark_mode();
    }

    #[test]
    fn matching_arguments_reach_the_host() {
        let host = StubHost::full();
        let b = bridge(host);
        let out = b.call(
            Operation::Vibrate,
            Shape::Void,
            &[HostArg::Int(40), HostArg::Float(0.5)],
        );
        assert!(matches!(out, Outcome::Returned(HostValue::Void)));
        assert_eq!(b.host().invocation_count(Operation::Vibrate), 1);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "marshaling mismatch")]
    fn wrong_argument_count_fails_loudly_in_debug() {
        let b = bridge(StubHost::full());
        let _ = b.call(Operation::Vibrate, Shape::Void, &[HostArg::Int(40)]);
    }
}
