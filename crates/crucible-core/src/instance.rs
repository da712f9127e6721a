//! Resolved job instances and their derived configuration flags.

use crate::axes::{BuildType, Compiler};
use crate::ids::InstanceId;
use crate::template::{JobTemplate, Toggle};
use serde::{Deserialize, Serialize};

/// GPU architecture the HIP conformance suite is pinned to.
pub const HIP_DEFAULT_ARCH: &str = "gfx1030";
/// Vendor platform HIP adapters build against.
pub const HIP_DEFAULT_PLATFORM: &str = "AMD";

/// HIP-only build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HipFlags {
    pub arch: String,
    pub platform: String,
}

impl Default for HipFlags {
    fn default() -> Self {
        Self {
            arch: HIP_DEFAULT_ARCH.to_string(),
            platform: HIP_DEFAULT_PLATFORM.to_string(),
        }
    }
}

/// Flags derived from an instance's fields. Pure functions of the instance;
/// the execution layer receives no residual ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlags {
    /// More than one adapter is built in this instance.
    pub multi_adapter: bool,
    /// Conformance tests go through the loader instead of a single adapter.
    pub conformance_uses_loader: bool,
    /// Name of the extra adapter to build, when multi-adapter.
    pub co_adapter_build: Option<String>,
    /// HIP arch/platform pins, when the adapter under test is HIP.
    pub hip: Option<HipFlags>,
    /// Adapter-specific tests are skipped when more than one adapter is
    /// built, to avoid cross-adapter test ambiguity.
    pub skip_adapter_tests: bool,
}

impl DerivedFlags {
    pub fn for_template(template: &JobTemplate) -> Self {
        let multi_adapter = template.multi_adapter();
        Self {
            multi_adapter,
            conformance_uses_loader: multi_adapter,
            co_adapter_build: multi_adapter.then(|| template.co_adapter_name.clone()),
            hip: (template.adapter_name == "HIP").then(HipFlags::default),
            skip_adapter_tests: multi_adapter,
        }
    }
}

/// One concrete combination surviving exclusion, with fully resolved
/// configuration. Immutable once produced; never matches an exclusion rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInstance {
    pub id: InstanceId,
    pub adapter_name: String,
    pub co_adapter_name: String,
    pub runner_name: String,
    pub platform: String,
    pub build_type: BuildType,
    pub compiler: Compiler,
    pub static_loader: Toggle,
    pub static_adapter: Toggle,
    pub flags: DerivedFlags,
}

impl JobInstance {
    pub fn new(template: &JobTemplate, build_type: BuildType, compiler: Compiler) -> Self {
        Self {
            id: InstanceId::new(),
            adapter_name: template.adapter_name.clone(),
            co_adapter_name: template.co_adapter_name.clone(),
            runner_name: template.runner_name.clone(),
            platform: template.platform.clone(),
            build_type,
            compiler,
            static_loader: template.static_loader,
            static_adapter: template.static_adapter,
            flags: DerivedFlags::for_template(template),
        }
    }

    /// Human-readable label, e.g. `HIP (Debug, gcc)`.
    pub fn display_name(&self) -> String {
        format!("{} ({}, {})", self.adapter_name, self.build_type, self.compiler)
    }
}
