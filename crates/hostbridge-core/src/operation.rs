// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Catalog of host operations the bridge knows how to call.
//
// Each operation has a fixed host method name and JVM type descriptor. The
// bridge resolves all of them once at construction; which ones actually
// exist depends on the host build.

use serde::{Deserialize, Serialize};

/// How the bridge treats an operation that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Optional host capability: queryable, returns a default when absent.
    Capability,
    /// One-way signal to the host: silently skipped when absent.
    Advisory,
    /// Needed by an accessor; absence is fatal for that accessor.
    Required,
}

/// A logical host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Restart,
    ForceQuit,
    SetKeepScreenOn,
    Alert,
    IsDarkModeSupported,
    IsDarkMode,
    GetAccentColor,
    GetBaseColor,
    GetClipboard,
    SetClipboard,
    HasClipboard,
    ShowDialog,
    ShowInputDialog,
    ShowFilePicker,
    RequestPermission,
    RequestPermissions,
    GetGrantedPermissions,
    GetGdextensionConfigFiles,
    GetCaCertificates,
    InitInputDevices,
    Vibrate,
    GetInputFallbackMapping,
    OnSetupCompleted,
    OnMainLoopStarted,
    OnTerminating,
    CreateNewInstance,
    GetRenderView,
    BeginBenchmarkMeasure,
    EndBenchmarkMeasure,
    DumpBenchmark,
    HasFeature,
    SignApk,
    VerifyApk,
    EnableImmersiveMode,
    IsInImmersiveMode,
    OnEditorWorkspaceSelected,
    GetActivity,
}

impl Operation {
    /// Every operation, in resolution order. The position of an operation in
    /// this array is its slot in the resolution table.
    pub const ALL: [Operation; 37] = [
        Self::Restart,
        Self::ForceQuit,
        Self::SetKeepScreenOn,
        Self::Alert,
        Self::IsDarkModeSupported,
        Self::IsDarkMode,
        Self::GetAccentColor,
        Self::GetBaseColor,
        Self::GetClipboard,
        Self::SetClipboard,
        Self::HasClipboard,
        Self::ShowDialog,
        Self::ShowInputDialog,
        Self::ShowFilePicker,
        Self::RequestPermission,
        Self::RequestPermissions,
        Self::GetGrantedPermissions,
        Self::GetGdextensionConfigFiles,
        Self::GetCaCertificates,
        Self::InitInputDevices,
        Self::Vibrate,
        Self::GetInputFallbackMapping,
        Self::OnSetupCompleted,
        Self::OnMainLoopStarted,
        Self::OnTerminating,
        Self::CreateNewInstance,
        Self::GetRenderView,
        Self::BeginBenchmarkMeasure,
        Self::EndBenchmarkMeasure,
        Self::DumpBenchmark,
        Self::HasFeature,
        Self::SignApk,
        Self::VerifyApk,
        Self::EnableImmersiveMode,
        Self::IsInImmersiveMode,
        Self::OnEditorWorkspaceSelected,
        Self::GetActivity,
    ];

    /// Slot of this operation in [`Operation::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Method name on the host class.
    pub fn host_name(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::ForceQuit => "forceQuit",
            Self::SetKeepScreenOn => "setKeepScreenOn",
            Self::Alert => "alert",
            Self::IsDarkModeSupported => "isDarkModeSupported",
            Self::IsDarkMode => "isDarkMode",
            Self::GetAccentColor => "getAccentColor",
            Self::GetBaseColor => "getBaseColor",
            Self::GetClipboard => "getClipboard",
            Self::SetClipboard => "setClipboard",
            Self::HasClipboard => "hasClipboard",
            Self::ShowDialog => "showDialog",
            Self::ShowInputDialog => "showInputDialog",
            Self::ShowFilePicker => "showFilePicker",
            Self::RequestPermission => "requestPermission",
            Self::RequestPermissions => "requestPermissions",
            Self::GetGrantedPermissions => "getGrantedPermissions",
            Self::GetGdextensionConfigFiles => "getGDExtensionConfigFiles",
            Self::GetCaCertificates => "getCACertificates",
            Self::InitInputDevices => "initInputDevices",
            Self::Vibrate => "vibrate",
            Self::GetInputFallbackMapping => "getInputFallbackMapping",
            Self::OnSetupCompleted => "onGodotSetupCompleted",
            Self::OnMainLoopStarted => "onGodotMainLoopStarted",
            Self::OnTerminating => "onGodotTerminating",
            Self::CreateNewInstance => "createNewGodotInstance",
            Self::GetRenderView => "getRenderView",
            Self::BeginBenchmarkMeasure => "nativeBeginBenchmarkMeasure",
            Self::EndBenchmarkMeasure => "nativeEndBenchmarkMeasure",
            Self::DumpBenchmark => "nativeDumpBenchmark",
            Self::HasFeature => "hasFeature",
            Self::SignApk => "nativeSignApk",
            Self::VerifyApk => "nativeVerifyApk",
            Self::EnableImmersiveMode => "nativeEnableImmersiveMode",
            Self::IsInImmersiveMode => "isInImmersiveMode",
            Self::OnEditorWorkspaceSelected => "nativeOnEditorWorkspaceSelected",
            Self::GetActivity => "getActivity",
        }
    }

    /// JVM type descriptor the host method is declared with.
    pub fn descriptor(self) -> &'static str {
        match self {
            Self::Restart
            | Self::InitInputDevices
            | Self::OnSetupCompleted
            | Self::OnMainLoopStarted
            | Self::OnTerminating => "()V",
            Self::ForceQuit => "(I)Z",
            Self::SetKeepScreenOn | Self::EnableImmersiveMode => "(Z)V",
            Self::Alert | Self::BeginBenchmarkMeasure | Self::EndBenchmarkMeasure => {
                "(Ljava/lang/String;Ljava/lang/String;)V"
            }
            Self::IsDarkModeSupported
            | Self::IsDarkMode
            | Self::HasClipboard
            | Self::RequestPermissions
            | Self::IsInImmersiveMode => "()Z",
            Self::GetAccentColor | Self::GetBaseColor => "()I",
            Self::GetClipboard | Self::GetCaCertificates | Self::GetInputFallbackMapping => {
                "()Ljava/lang/String;"
            }
            Self::SetClipboard | Self::DumpBenchmark | Self::OnEditorWorkspaceSelected => {
                "(Ljava/lang/String;)V"
            }
            Self::ShowDialog => "(Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;)V",
            Self::ShowInputDialog => {
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)V"
            }
            Self::ShowFilePicker => {
                "(Ljava/lang/String;Ljava/lang/String;I[Ljava/lang/String;)V"
            }
            Self::RequestPermission | Self::HasFeature => "(Ljava/lang/String;)Z",
            Self::GetGrantedPermissions | Self::GetGdextensionConfigFiles => {
                "()[Ljava/lang/String;"
            }
            Self::Vibrate => "(IF)V",
            Self::CreateNewInstance => "([Ljava/lang/String;)I",
            Self::GetRenderView => "()Lorg/godotengine/godot/GodotRenderView;",
            // input, output, keystore path, keystore user, keystore password
            Self::SignApk => {
                "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)I"
            }
            Self::VerifyApk => "(Ljava/lang/String;)I",
            Self::GetActivity => "()Landroid/app/Activity;",
        }
    }

    /// Resolution policy for this operation.
    pub fn kind(self) -> OperationKind {
        match self {
            Self::Restart
            | Self::SetKeepScreenOn
            | Self::Alert
            | Self::InitInputDevices
            | Self::Vibrate
            | Self::OnSetupCompleted
            | Self::OnMainLoopStarted
            | Self::OnTerminating
            | Self::BeginBenchmarkMeasure
            | Self::EndBenchmarkMeasure
            | Self::DumpBenchmark => OperationKind::Advisory,
            Self::GetRenderView => OperationKind::Required,
            _ => OperationKind::Capability,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.host_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (slot, op) in Operation::ALL.iter().enumerate() {
            assert_eq!(op.index(), slot, "{op} is out of place");
        }
    }

    #[test]
    fn host_names_are_unique() {
        let mut names: Vec<_> = Operation::ALL.iter().map(|op| op.host_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn descriptors_are_method_types() {
        for op in Operation::ALL {
            let descriptor = op.descriptor();
            assert!(descriptor.starts_with('('), "{op}: {descriptor}");
            assert!(descriptor.contains(')'), "{op}: {descriptor}");
        }
        assert_eq!(Operation::VerifyApk.descriptor(), "(Ljava/lang/String;)I");
        assert_eq!(Operation::EnableImmersiveMode.descriptor(), "(Z)V");
        assert_eq!(Operation::IsInImmersiveMode.descriptor(), "()Z");
        assert_eq!(
            Operation::OnEditorWorkspaceSelected.descriptor(),
            "(Ljava/lang/String;)V"
        );
        assert_eq!(Operation::GetActivity.descriptor(), "()Landroid/app/Activity;");
    }

    #[test]
    fn lifecycle_notifications_are_advisory() {
        for op in [
            Operation::OnSetupCompleted,
            Operation::OnMainLoopStarted,
            Operation::OnTerminating,
        ] {
            assert_eq!(op.kind(), OperationKind::Advisory);
        }
        assert_eq!(Operation::GetRenderView.kind(), OperationKind::Required);
        assert_eq!(Operation::SignApk.kind(), OperationKind::Capability);
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Operation::GetAccentColor).unwrap();
        assert_eq!(json, "\"get_accent_color\"");
        let op: Operation = serde_json::from_str("\"sign_apk\"").unwrap();
        assert_eq!(op, Operation::SignApk);
    }
}
