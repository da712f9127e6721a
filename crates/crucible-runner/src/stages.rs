//! Stage command planning.
//!
//! Turns a resolved job instance into the concrete command lines for the
//! fixed pipeline: fetch toolchain, configure, build, install, test. The
//! external tools (package fetcher, cmake, ctest) do all the real work; this
//! module only renders their invocations from the instance's configuration.

use crucible_core::instance::JobInstance;
use crucible_core::stage::StageKind;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::runner::StageCommand;

/// Per-test-invocation ceiling handed to the test runner, in seconds.
pub const TEST_TIMEOUT_SECONDS: u64 = 180;

/// Filesystem layout and toolchain hook for a run.
#[derive(Debug, Clone)]
pub struct StageSettings {
    /// Checkout of the runtime source tree, relative to the instance
    /// workspace unless absolute.
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub install_dir: PathBuf,
    /// Command fetching the compiler toolchain into the workspace.
    pub toolchain_command: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            build_dir: PathBuf::from("build"),
            install_dir: PathBuf::from("install"),
            toolchain_command: "./scripts/fetch-toolchain.sh".to_string(),
        }
    }
}

/// Render the command sequence for one job instance.
///
/// The adapter-specific test suite is omitted when the instance builds more
/// than one adapter; the conformance suite always runs.
pub fn plan(instance: &JobInstance, settings: &StageSettings) -> Vec<StageCommand> {
    let build = settings.build_dir.display().to_string();

    let mut commands = vec![
        StageCommand::new(StageKind::FetchToolchain, settings.toolchain_command.clone()),
        StageCommand::new(StageKind::Configure, configure_command(instance, settings)),
        StageCommand::new(StageKind::Build, format!("cmake --build {} -j $(nproc)", build)),
        StageCommand::new(
            StageKind::Install,
            format!(
                "cmake --install {} --prefix {}",
                build,
                settings.install_dir.display()
            ),
        ),
        StageCommand::labeled(
            StageKind::Test,
            "test (conformance)",
            ctest_command(instance, settings, "conformance"),
        ),
    ];

    if !instance.flags.skip_adapter_tests {
        commands.push(StageCommand::labeled(
            StageKind::Test,
            "test (adapter)",
            ctest_command(instance, settings, "adapter-specific"),
        ));
    }

    commands
}

fn configure_command(instance: &JobInstance, settings: &StageSettings) -> String {
    let mut args = vec![
        format!(
            "cmake -S {} -B {}",
            settings.source_dir.display(),
            settings.build_dir.display()
        ),
        format!("-DCMAKE_C_COMPILER={}", instance.compiler.cc()),
        format!("-DCMAKE_CXX_COMPILER={}", instance.compiler.cxx()),
        format!("-DCMAKE_BUILD_TYPE={}", instance.build_type),
        "-DBUILD_TESTS=ON".to_string(),
        format!("-DBUILD_ADAPTER_{}=ON", instance.adapter_name),
    ];

    if let Some(co_adapter) = &instance.flags.co_adapter_build {
        args.push(format!("-DBUILD_ADAPTER_{}=ON", co_adapter));
    }

    args.push(format!("-DSTATIC_LOADER={}", instance.static_loader));
    args.push(format!(
        "-DSTATIC_ADAPTER_{}={}",
        instance.adapter_name, instance.static_adapter
    ));

    if instance.flags.conformance_uses_loader {
        args.push("-DCONFORMANCE_TEST_LOADER=ON".to_string());
    }

    if let Some(hip) = &instance.flags.hip {
        args.push(format!("-DCONFORMANCE_AMD_ARCH={}", hip.arch));
        args.push(format!("-DHIP_PLATFORM={}", hip.platform));
    }

    args.join(" ")
}

fn ctest_command(instance: &JobInstance, settings: &StageSettings, label: &str) -> String {
    format!(
        "ctest --test-dir {} -C {} -L {} --timeout {} --output-on-failure",
        settings.build_dir.display(),
        instance.build_type,
        label,
        TEST_TIMEOUT_SECONDS
    )
}

/// Environment variables every stage of an instance runs with.
pub fn environment(instance: &JobInstance) -> HashMap<String, String> {
    let mut env = HashMap::from([
        ("CC".to_string(), instance.compiler.cc().to_string()),
        ("CXX".to_string(), instance.compiler.cxx().to_string()),
        ("ADAPTER_NAME".to_string(), instance.adapter_name.clone()),
        ("RUNNER_NAME".to_string(), instance.runner_name.clone()),
    ]);

    if !instance.platform.is_empty() {
        env.insert("ADAPTER_PLATFORM".to_string(), instance.platform.clone());
    }

    env
}
