//! Cartesian expansion and exclusion filtering.

use crucible_core::Result;
use crucible_core::axes::AxisSet;
use crucible_core::exclusion::ExclusionRule;
use crucible_core::instance::JobInstance;
use crucible_core::template::JobTemplate;
use tracing::{debug, info};

/// Resolver turning one job template into the concrete set of job instances
/// to execute.
pub struct MatrixResolver;

impl MatrixResolver {
    pub fn new() -> Self {
        Self
    }

    /// Expand `template` against `axes`, discarding every combination that
    /// matches an exclusion rule.
    ///
    /// Pure and deterministic: identical inputs yield an identical instance
    /// set. Instances come out in (build_type, compiler) declaration order,
    /// but callers must not rely on it. A template failing validation is
    /// fatal; no partial instance set is returned.
    pub fn resolve(
        &self,
        template: &JobTemplate,
        axes: &AxisSet,
        rules: &[ExclusionRule],
    ) -> Result<Vec<JobInstance>> {
        template.validate()?;

        let mut instances = Vec::new();

        for &build_type in &axes.build_types {
            for &compiler in &axes.compilers {
                if let Some(rule) = rules.iter().find(|r| r.matches(template, build_type, compiler))
                {
                    debug!(
                        adapter = %template.adapter_name,
                        %build_type,
                        %compiler,
                        reason = rule.reason.as_deref().unwrap_or("unspecified"),
                        "combination excluded"
                    );
                    continue;
                }

                instances.push(JobInstance::new(template, build_type, compiler));
            }
        }

        info!(
            adapter = %template.adapter_name,
            candidates = axes.combination_count(),
            resolved = instances.len(),
            "matrix resolved"
        );

        Ok(instances)
    }
}

impl Default for MatrixResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;
    use crucible_core::Error;
    use crucible_core::axes::{BuildType, Compiler};
    use crucible_core::template::Toggle;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn template(adapter: &str) -> JobTemplate {
        JobTemplate {
            adapter_name: adapter.to_string(),
            co_adapter_name: String::new(),
            runner_name: "HW_RUNNER".to_string(),
            platform: String::new(),
            static_loader: Toggle::Off,
            static_adapter: Toggle::Off,
        }
    }

    fn names(instances: &[JobInstance]) -> BTreeSet<String> {
        instances.iter().map(|i| i.display_name()).collect()
    }

    #[test]
    fn test_output_never_exceeds_axis_product() {
        let resolver = MatrixResolver::new();
        let instances = resolver
            .resolve(&template("L0"), &AxisSet::default(), &default_rules())
            .unwrap();
        assert!(instances.len() <= 4);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = MatrixResolver::new();
        let tpl = template("CUDA");
        let axes = AxisSet::default();
        let rules = default_rules();

        let first = names(&resolver.resolve(&tpl, &axes, &rules).unwrap());
        let second = names(&resolver.resolve(&tpl, &axes, &rules).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_surviving_instance_matches_any_rule() {
        let resolver = MatrixResolver::new();
        let rules = default_rules();

        let mut tpl = template("L0");
        tpl.static_loader = Toggle::On;

        let instances = resolver.resolve(&tpl, &AxisSet::default(), &rules).unwrap();
        for instance in &instances {
            for rule in &rules {
                assert!(!rule.matches(&tpl, instance.build_type, instance.compiler));
            }
        }
    }

    #[test]
    fn test_missing_adapter_name_is_fatal() {
        let resolver = MatrixResolver::new();
        let tpl = template("");
        let err = resolver
            .resolve(&tpl, &AxisSet::default(), &default_rules())
            .unwrap_err();
        assert!(matches!(err, Error::MissingField("adapter_name")));
    }

    #[test]
    fn test_clang_excluded_on_empty_platform() {
        // Scenario: L0 with no platform override never builds with clang.
        let resolver = MatrixResolver::new();
        let instances = resolver
            .resolve(&template("L0"), &AxisSet::default(), &default_rules())
            .unwrap();

        assert_eq!(instances.len(), 2);
        assert!(instances.iter().all(|i| i.compiler == Compiler::Gcc));
    }

    #[test]
    fn test_clang_allowed_with_platform_override() {
        let resolver = MatrixResolver::new();
        let mut tpl = template("HIP");
        tpl.platform = "AMD".to_string();

        let instances = resolver
            .resolve(&tpl, &AxisSet::default(), &default_rules())
            .unwrap();
        assert_eq!(instances.len(), 4);
    }

    #[test]
    fn test_static_loader_excludes_release() {
        // Scenario: CUDA with a static loader never builds Release.
        let resolver = MatrixResolver::new();
        let mut tpl = template("CUDA");
        tpl.static_loader = Toggle::On;

        let instances = resolver
            .resolve(&tpl, &AxisSet::default(), &default_rules())
            .unwrap();

        assert_eq!(names(&instances), BTreeSet::from(["CUDA (Debug, gcc)".to_string()]));
    }

    #[test]
    fn test_hip_debug_gcc_instance() {
        let resolver = MatrixResolver::new();
        let axes = AxisSet {
            build_types: vec![BuildType::Debug],
            compilers: vec![Compiler::Gcc],
        };

        let instances = resolver
            .resolve(&template("HIP"), &axes, &default_rules())
            .unwrap();

        assert_eq!(instances.len(), 1);
        let hip = instances[0].flags.hip.as_ref().unwrap();
        assert_eq!(hip.arch, "gfx1030");
        assert_eq!(hip.platform, "AMD");
        assert!(!instances[0].flags.skip_adapter_tests);
    }

    #[test]
    fn test_multi_adapter_instance() {
        let resolver = MatrixResolver::new();
        let mut tpl = template("L0");
        tpl.co_adapter_name = "OPENCL".to_string();
        let axes = AxisSet {
            build_types: vec![BuildType::Debug],
            compilers: vec![Compiler::Gcc],
        };

        let instances = resolver.resolve(&tpl, &axes, &default_rules()).unwrap();

        assert_eq!(instances.len(), 1);
        let flags = &instances[0].flags;
        assert!(flags.multi_adapter);
        assert!(flags.conformance_uses_loader);
        assert!(flags.skip_adapter_tests);
        assert_eq!(flags.co_adapter_build.as_deref(), Some("OPENCL"));
    }

    #[test]
    fn static_flags_are_independent() {
        // static_adapter=ON must exclude Release/clang even with the loader
        // linked dynamically, and must not constrain static_loader templates
        // any further than their own rules do.
        let resolver = MatrixResolver::new();
        let mut tpl = template("L0");
        tpl.static_adapter = Toggle::On;
        tpl.static_loader = Toggle::Off;

        let instances = resolver
            .resolve(&tpl, &AxisSet::default(), &default_rules())
            .unwrap();

        assert_eq!(names(&instances), BTreeSet::from(["L0 (Debug, gcc)".to_string()]));
    }

    #[test]
    fn test_user_rules_apply_on_top_of_defaults() {
        let resolver = MatrixResolver::new();
        let mut rules = default_rules();
        rules.push(ExclusionRule {
            build_type: Some(BuildType::Debug),
            ..Default::default()
        });

        let instances = resolver
            .resolve(&template("L0"), &AxisSet::default(), &rules)
            .unwrap();

        assert_eq!(names(&instances), BTreeSet::from(["L0 (Release, gcc)".to_string()]));
    }
}
