//! Hardware-access gate.
//!
//! Whether real adapter hardware is reachable is decided once per run, before
//! any instance starts. A closed gate skips the run; it does not fail it. The
//! gate is an explicit value passed into the pipeline entry point, never
//! ambient state, so it can be tested in isolation.

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareGate {
    available: bool,
}

impl HardwareGate {
    pub fn new(available: bool) -> Self {
        Self { available }
    }

    pub fn open() -> Self {
        Self::new(true)
    }

    pub fn closed() -> Self {
        Self::new(false)
    }

    /// Gate driven by an environment variable: open when the variable is set
    /// to anything other than "0" or "false".
    pub fn from_env(var: &str) -> Self {
        let available = std::env::var(var)
            .map(|v| v != "0" && v != "false")
            .unwrap_or(false);
        if !available {
            info!(var, "hardware gate closed");
        }
        Self::new(available)
    }

    pub fn is_open(&self) -> bool {
        self.available
    }
}
