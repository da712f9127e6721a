//! Job template definition types.
//!
//! These types represent the user-authored job description: which adapter to
//! build and test, on which runner, with which linking choices. A template is
//! expanded against an [`AxisSet`](crate::axes::AxisSet) to produce concrete
//! job instances.

use crate::axes::AxisSet;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionRule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ON/OFF build-time switch.
///
/// An empty string deserializes as OFF: callers that leave the field blank
/// mean "not supplied", not a third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum Toggle {
    #[serde(rename = "ON", alias = "on")]
    On,
    #[default]
    #[serde(rename = "OFF", alias = "off", alias = "")]
    Off,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::On => "ON",
            Toggle::Off => "OFF",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toggle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ON" | "on" => Ok(Toggle::On),
            "OFF" | "off" | "" => Ok(Toggle::Off),
            other => Err(Error::InvalidToggle(other.to_string())),
        }
    }
}

/// A user-authored adapter job template.
///
/// `static_loader` and `static_adapter` are independent inputs; each feeds
/// its own exclusion rules.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobTemplate {
    /// Name of the adapter under test, e.g. "L0", "CUDA", "HIP", "OPENCL".
    pub adapter_name: String,
    /// Optional second adapter built in the same instance. Empty = not set.
    #[serde(default)]
    pub co_adapter_name: String,
    /// Label of the runner the job is dispatched to. Passed through untouched.
    pub runner_name: String,
    /// Vendor platform override. Empty on most runners.
    #[serde(default)]
    pub platform: String,
    /// Link the loader statically.
    #[serde(default)]
    pub static_loader: Toggle,
    /// Link the adapter statically.
    #[serde(default)]
    pub static_adapter: Toggle,
}

impl JobTemplate {
    /// Check required fields. Fatal on failure: no instances may be produced
    /// from an invalid template.
    pub fn validate(&self) -> Result<()> {
        if self.adapter_name.is_empty() {
            return Err(Error::MissingField("adapter_name"));
        }
        if self.runner_name.is_empty() {
            return Err(Error::MissingField("runner_name"));
        }
        Ok(())
    }

    /// True when this template builds more than one adapter per instance.
    pub fn multi_adapter(&self) -> bool {
        !self.co_adapter_name.is_empty()
    }
}

/// A complete job file: template plus optional axis and exclusion overrides.
///
/// User-supplied exclusions are applied in addition to the built-in rule set,
/// never instead of it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobDefinition {
    #[serde(flatten)]
    pub template: JobTemplate,
    #[serde(default)]
    pub axes: AxisSet,
    #[serde(default)]
    pub exclude: Vec<ExclusionRule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_requires_adapter_name() {
        let template = JobTemplate {
            adapter_name: String::new(),
            co_adapter_name: String::new(),
            runner_name: "CUDA_H100".to_string(),
            platform: String::new(),
            static_loader: Toggle::Off,
            static_adapter: Toggle::Off,
        };
        assert!(matches!(
            template.validate(),
            Err(Error::MissingField("adapter_name"))
        ));
    }

    #[test]
    fn test_toggle_empty_string_is_off() {
        assert_eq!("".parse::<Toggle>().unwrap(), Toggle::Off);
        assert_eq!("ON".parse::<Toggle>().unwrap(), Toggle::On);
        assert!("maybe".parse::<Toggle>().is_err());
    }

    #[test]
    fn test_job_definition_from_yaml() {
        let yaml = r#"
adapter_name: L0
runner_name: INTEL_PVC
static_loader: ""
"#;
        let def: JobDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.template.adapter_name, "L0");
        assert_eq!(def.template.static_loader, Toggle::Off);
        assert_eq!(def.axes.combination_count(), 4);
        assert!(def.exclude.is_empty());
    }
}
