//! Per-run orchestration.
//!
//! Each job instance runs its stages strictly in order inside its own
//! workspace directory. Instances share no state: one instance failing a
//! stage never aborts its siblings. A closed hardware gate skips the whole
//! run before any process is spawned.

use crate::gate::HardwareGate;
use crate::runner::{OutputLine, OutputStream, StageContext, StageRunner};
use crate::stages::{self, StageSettings};
use crucible_core::ids::RunId;
use crucible_core::instance::JobInstance;
use crucible_core::stage::{InstanceStatus, StageKind};
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Outcome of one stage command of one instance.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: StageKind,
    pub label: String,
    pub exit_code: i32,
    pub success: bool,
    pub duration_ms: u64,
}

/// Outcome of one job instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub instance: JobInstance,
    pub status: InstanceStatus,
    pub stages: Vec<StageReport>,
    pub duration_ms: u64,
}

/// Outcome of a whole run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub id: RunId,
    pub gate_open: bool,
    pub instances: Vec<InstanceReport>,
}

impl RunReport {
    /// A skipped run counts as success: it is a no-op outcome, not an error.
    pub fn success(&self) -> bool {
        self.instances.iter().all(|i| i.status.is_success())
    }
}

/// Execute every resolved instance of a run.
///
/// Instances are independent units of work and run concurrently, each in its
/// own workspace subdirectory.
pub async fn run_all(
    instances: Vec<JobInstance>,
    gate: HardwareGate,
    runner: Arc<dyn StageRunner>,
    settings: &StageSettings,
    workspace_root: &Path,
) -> RunReport {
    let id = RunId::new();

    if !gate.is_open() {
        info!(run = %id, "hardware gate closed, skipping run");
        let instances = instances
            .into_iter()
            .map(|instance| InstanceReport {
                instance,
                status: InstanceStatus::Skipped,
                stages: Vec::new(),
                duration_ms: 0,
            })
            .collect();
        return RunReport {
            id,
            gate_open: false,
            instances,
        };
    }

    info!(run = %id, count = instances.len(), "starting run");

    let mut join_set = JoinSet::new();
    for instance in instances {
        let runner = Arc::clone(&runner);
        let settings = settings.clone();
        let workspace = workspace_root.join(instance.id.to_string());

        join_set.spawn(async move { run_instance(instance, runner, &settings, workspace).await });
    }

    let mut reports = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => error!(error = %e, "instance task panicked"),
        }
    }

    RunReport {
        id,
        gate_open: true,
        instances: reports,
    }
}

/// Execute the stage sequence of one instance.
///
/// Stage failures are captured in the report, never propagated: sibling
/// instances must be unaffected.
pub async fn run_instance(
    instance: JobInstance,
    runner: Arc<dyn StageRunner>,
    settings: &StageSettings,
    workspace: PathBuf,
) -> InstanceReport {
    let start = std::time::Instant::now();
    let name = instance.display_name();

    info!(instance = %name, workspace = %workspace.display(), "instance started");

    if let Err(e) = tokio::fs::create_dir_all(&workspace).await {
        error!(instance = %name, error = %e, "failed to create workspace");
        return InstanceReport {
            instance,
            status: InstanceStatus::Failure,
            stages: Vec::new(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
    }

    let env = stages::environment(&instance);
    let mut reports = Vec::new();
    let mut status = InstanceStatus::Success;

    for command in stages::plan(&instance, settings) {
        let ctx = StageContext {
            workspace: workspace.clone(),
            env: env.clone(),
            command: command.clone(),
        };

        let (tx, mut rx) = mpsc::channel::<OutputLine>(256);
        let log_name = name.clone();
        let log_label = command.label.clone();
        let printer = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                match line.stream {
                    OutputStream::Stdout => {
                        debug!(instance = %log_name, stage = %log_label, "{}", line.content)
                    }
                    OutputStream::Stderr => {
                        warn!(instance = %log_name, stage = %log_label, "{}", line.content)
                    }
                }
            }
        });

        let result = runner.execute(&ctx, tx).await;
        let _ = printer.await;

        match result {
            Ok(result) => {
                let success = result.success;
                reports.push(StageReport {
                    stage: command.stage,
                    label: command.label.clone(),
                    exit_code: result.exit_code,
                    success,
                    duration_ms: result.duration_ms,
                });

                if !success {
                    error!(
                        instance = %name,
                        stage = %command.label,
                        exit_code = result.exit_code,
                        "stage failed"
                    );
                    status = InstanceStatus::Failure;
                    break;
                }
            }
            Err(e) => {
                error!(instance = %name, stage = %command.label, error = %e, "stage error");
                reports.push(StageReport {
                    stage: command.stage,
                    label: command.label.clone(),
                    exit_code: -1,
                    success: false,
                    duration_ms: 0,
                });
                status = InstanceStatus::Failure;
                break;
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(instance = %name, ?status, duration_ms, "instance finished");

    InstanceReport {
        instance,
        status,
        stages: reports,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{OutputLine, StageResult};
    use async_trait::async_trait;
    use crucible_core::Result;
    use crucible_core::axes::{BuildType, Compiler};
    use crucible_core::template::{JobTemplate, Toggle};
    use std::sync::Mutex;

    /// Runner stub failing every command whose label matches `fail_on`.
    struct ScriptedRunner {
        fail_on: Option<&'static str>,
        executed: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(fail_on: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                fail_on,
                executed: Mutex::new(Vec::new()),
            })
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StageRunner for ScriptedRunner {
        async fn execute(
            &self,
            ctx: &StageContext,
            _output_tx: mpsc::Sender<OutputLine>,
        ) -> Result<StageResult> {
            self.executed.lock().unwrap().push(ctx.command.label.clone());
            let fail = self.fail_on == Some(ctx.command.label.as_str());
            Ok(StageResult {
                exit_code: if fail { 1 } else { 0 },
                success: !fail,
                duration_ms: 1,
            })
        }
    }

    fn instance(adapter: &str) -> JobInstance {
        let template = JobTemplate {
            adapter_name: adapter.to_string(),
            co_adapter_name: String::new(),
            runner_name: "HW_RUNNER".to_string(),
            platform: String::new(),
            static_loader: Toggle::Off,
            static_adapter: Toggle::Off,
        };
        JobInstance::new(&template, BuildType::Debug, Compiler::Gcc)
    }

    #[tokio::test]
    async fn test_closed_gate_skips_without_spawning() {
        let runner = ScriptedRunner::new(None);
        let workspace = tempfile::tempdir().unwrap();

        let report = run_all(
            vec![instance("L0"), instance("CUDA")],
            HardwareGate::closed(),
            runner.clone(),
            &StageSettings::default(),
            workspace.path(),
        )
        .await;

        assert!(!report.gate_open);
        assert!(report.success());
        assert_eq!(report.instances.len(), 2);
        assert!(
            report
                .instances
                .iter()
                .all(|i| i.status == InstanceStatus::Skipped)
        );
        assert!(runner.executed().is_empty());
    }

    #[tokio::test]
    async fn test_successful_instance_runs_all_stages() {
        let runner = ScriptedRunner::new(None);
        let workspace = tempfile::tempdir().unwrap();

        let report = run_instance(
            instance("CUDA"),
            runner.clone(),
            &StageSettings::default(),
            workspace.path().join("cuda"),
        )
        .await;

        assert_eq!(report.status, InstanceStatus::Success);
        // 5 pipeline stages, test split into conformance + adapter suites
        assert_eq!(report.stages.len(), 6);
        assert_eq!(runner.executed().first().map(String::as_str), Some("fetch-toolchain"));
    }

    #[tokio::test]
    async fn test_stage_failure_stops_later_stages() {
        let runner = ScriptedRunner::new(Some("configure"));
        let workspace = tempfile::tempdir().unwrap();

        let report = run_instance(
            instance("CUDA"),
            runner.clone(),
            &StageSettings::default(),
            workspace.path().join("cuda"),
        )
        .await;

        assert_eq!(report.status, InstanceStatus::Failure);
        assert_eq!(
            runner.executed(),
            vec!["fetch-toolchain".to_string(), "configure".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failing_instance_does_not_abort_siblings() {
        // Every instance fails its build stage, yet every instance still
        // gets as far as its own build.
        let runner = ScriptedRunner::new(Some("build"));
        let workspace = tempfile::tempdir().unwrap();

        let report = run_all(
            vec![instance("L0"), instance("CUDA")],
            HardwareGate::open(),
            runner.clone(),
            &StageSettings::default(),
            workspace.path(),
        )
        .await;

        assert!(!report.success());
        assert_eq!(report.instances.len(), 2);
        assert!(
            report
                .instances
                .iter()
                .all(|i| i.status == InstanceStatus::Failure)
        );
        let builds = runner
            .executed()
            .iter()
            .filter(|l| l.as_str() == "build")
            .count();
        assert_eq!(builds, 2);
    }
}
