// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// hostbridge-probe — builds a bridge against a described host build and
// prints which operations it resolved.
//
// Entry point. Initialises logging, loads the host profile and bridge
// configuration, then prints the capability report as JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hostbridge::stub::{HostProfile, StubHost};
use hostbridge::{CapabilityReport, HostBridge};
use hostbridge_core::BridgeConfig;
use hostbridge_core::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "hostbridge-probe",
    version,
    about = "Report host operations a host build provides"
)]
struct Cli {
    /// JSON host profile (missing operations, canned responses).
    #[arg(long)]
    profile: Option<PathBuf>,

    /// JSON bridge configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also fetch the render view and send the lifecycle notifications.
    #[arg(long)]
    exercise: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    hostbridge_core::logging::init(&cli.log);

    tracing::info!("hostbridge-probe starting");

    let report = match probe(&cli) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "probe failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize capability report");
            ExitCode::FAILURE
        }
    }
}

fn probe(cli: &Cli) -> Result<CapabilityReport> {
    let profile = match &cli.profile {
        Some(path) => HostProfile::load(path)?,
        None => HostProfile::default(),
    };
    let config = match &cli.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    let bridge = HostBridge::new(StubHost::from_profile(profile), &config)?;

    if cli.exercise {
        bridge.on_setup_completed();
        match bridge.view() {
            Ok(_) => tracing::info!("render view available"),
            Err(e) => tracing::warn!(error = %e, "render view unavailable"),
        }
        bridge.on_main_loop_started();
        bridge.on_terminating();
    }

    Ok(bridge.capability_report())
}
