//! Core stage runner trait and types.

use async_trait::async_trait;
use crucible_core::Result;
use crucible_core::stage::StageKind;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Output line from stage execution.
#[derive(Debug, Clone)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub content: String,
    pub line_number: u32,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Output stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One external command to run on behalf of a pipeline stage. The test stage
/// contributes more than one command (conformance plus adapter-specific).
#[derive(Debug, Clone)]
pub struct StageCommand {
    pub stage: StageKind,
    /// Display label, e.g. `test (conformance)`.
    pub label: String,
    pub script: String,
}

impl StageCommand {
    pub fn new(stage: StageKind, script: impl Into<String>) -> Self {
        Self {
            stage,
            label: stage.to_string(),
            script: script.into(),
        }
    }

    pub fn labeled(stage: StageKind, label: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            script: script.into(),
        }
    }
}

/// Result of running one stage command.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub exit_code: i32,
    pub success: bool,
    pub duration_ms: u64,
}

/// Context for stage execution.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub workspace: PathBuf,
    pub env: HashMap<String, String>,
    pub command: StageCommand,
}

/// Trait for stage execution.
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Execute a stage command, streaming output to the provided channel.
    async fn execute(
        &self,
        ctx: &StageContext,
        output_tx: mpsc::Sender<OutputLine>,
    ) -> Result<StageResult>;
}

/// Configuration for stage execution.
///
/// There is deliberately no retry logic and no default harness-level timeout;
/// the test runner applies its own per-invocation ceiling.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub timeout_seconds: Option<u64>,
}
