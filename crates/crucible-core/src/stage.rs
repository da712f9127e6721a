//! The fixed per-instance pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the per-instance pipeline. Stages run strictly in this
/// order; each depends on artifacts produced by the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    FetchToolchain,
    Configure,
    Build,
    Install,
    Test,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        StageKind::FetchToolchain,
        StageKind::Configure,
        StageKind::Build,
        StageKind::Install,
        StageKind::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::FetchToolchain => "fetch-toolchain",
            StageKind::Configure => "configure",
            StageKind::Build => "build",
            StageKind::Install => "install",
            StageKind::Test => "test",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of one job instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Pending,
    Running,
    Success,
    Failure,
    Skipped,
}

impl InstanceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Success | InstanceStatus::Failure | InstanceStatus::Skipped
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InstanceStatus::Success | InstanceStatus::Skipped)
    }
}
