//! The built-in exclusion rule set.
//!
//! Historical note: an earlier revision of this harness fed the static-adapter
//! rules from the static-loader input, so static_adapter=ON never excluded
//! anything on its own. The two inputs are wired independently here; see the
//! regression test in `resolver.rs`.

use crucible_core::axes::{BuildType, Compiler};
use crucible_core::exclusion::ExclusionRule;
use crucible_core::template::Toggle;

/// Rules every resolution applies, in declaration order.
pub fn default_rules() -> Vec<ExclusionRule> {
    vec![
        // clang miscompiles the loader on runners without a vendor platform
        // override; drop clang there until the toolchain is fixed.
        ExclusionRule {
            platform: Some(String::new()),
            compiler: Some(Compiler::Clang),
            reason: Some("clang toolchain defect on default-platform runners".to_string()),
            ..Default::default()
        },
        // Static linking is only validated with Debug + gcc.
        ExclusionRule {
            static_loader: Some(Toggle::On),
            build_type: Some(BuildType::Release),
            reason: Some("static loader builds are Debug-only".to_string()),
            ..Default::default()
        },
        ExclusionRule {
            static_loader: Some(Toggle::On),
            compiler: Some(Compiler::Clang),
            reason: Some("static loader builds are gcc-only".to_string()),
            ..Default::default()
        },
        ExclusionRule {
            static_adapter: Some(Toggle::On),
            build_type: Some(BuildType::Release),
            reason: Some("static adapter builds are Debug-only".to_string()),
            ..Default::default()
        },
        ExclusionRule {
            static_adapter: Some(Toggle::On),
            compiler: Some(Compiler::Clang),
            reason: Some("static adapter builds are gcc-only".to_string()),
            ..Default::default()
        },
    ]
}
