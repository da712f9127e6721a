//! Parsing tests for user-authored job files.

use crucible_core::axes::{BuildType, Compiler};
use crucible_core::template::{JobDefinition, Toggle};

#[test]
fn test_full_job_file() {
    let yaml = r#"
adapter_name: HIP
co_adapter_name: OPENCL
runner_name: AMD_MI210
platform: "AMD"
static_loader: "OFF"
static_adapter: "ON"

axes:
  build_types: [Debug]
  compilers: [gcc]

exclude:
  - compiler: clang
    reason: local toolchain has no clang
"#;

    let def: JobDefinition = serde_yaml::from_str(yaml).expect("parse job file");

    assert_eq!(def.template.adapter_name, "HIP");
    assert_eq!(def.template.co_adapter_name, "OPENCL");
    assert_eq!(def.template.static_loader, Toggle::Off);
    assert_eq!(def.template.static_adapter, Toggle::On);
    assert!(def.template.multi_adapter());

    assert_eq!(def.axes.build_types, vec![BuildType::Debug]);
    assert_eq!(def.axes.compilers, vec![Compiler::Gcc]);

    assert_eq!(def.exclude.len(), 1);
    assert_eq!(def.exclude[0].compiler, Some(Compiler::Clang));
    assert_eq!(def.exclude[0].build_type, None);
}

#[test]
fn test_minimal_job_file_gets_defaults() {
    let yaml = "adapter_name: L0\nrunner_name: INTEL_PVC\n";
    let def: JobDefinition = serde_yaml::from_str(yaml).expect("parse job file");

    def.template.validate().expect("valid template");
    assert!(!def.template.multi_adapter());
    assert_eq!(def.template.platform, "");
    assert_eq!(def.template.static_loader, Toggle::Off);
    assert_eq!(def.axes.combination_count(), 4);
    assert!(def.exclude.is_empty());
}

#[test]
fn test_rejects_unknown_toggle_value() {
    let yaml = "adapter_name: L0\nrunner_name: INTEL_PVC\nstatic_loader: MAYBE\n";
    assert!(serde_yaml::from_str::<JobDefinition>(yaml).is_err());
}
