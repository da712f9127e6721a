//! Stage execution engine for Crucible CI.
//!
//! Takes the job instances the matrix resolver produced and runs the fixed
//! per-instance pipeline (fetch toolchain, configure, build, install, test)
//! by spawning external processes. Instances are independent of each other;
//! stages within one instance are strictly sequential.

pub mod gate;
pub mod pipeline;
pub mod runner;
pub mod shell;
pub mod stages;

pub use gate::HardwareGate;
pub use pipeline::{InstanceReport, RunReport, StageReport, run_all, run_instance};
pub use runner::{OutputLine, OutputStream, RunnerConfig, StageCommand, StageContext, StageResult, StageRunner};
pub use shell::ShellRunner;
pub use stages::StageSettings;
