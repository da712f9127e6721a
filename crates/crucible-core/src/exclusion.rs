//! Wildcard-capable exclusion rules.
//!
//! A rule is a partial-match pattern over a candidate (template, build_type,
//! compiler) combination: every field the rule names must equal the
//! candidate's value; fields left unset always match.

use crate::axes::{BuildType, Compiler};
use crate::template::{JobTemplate, Toggle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExclusionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_loader: Option<Toggle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_adapter: Option<Toggle>,
    /// Human-readable justification, surfaced in logs when the rule fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExclusionRule {
    /// True when every field this rule names equals the candidate's value.
    pub fn matches(&self, template: &JobTemplate, build_type: BuildType, compiler: Compiler) -> bool {
        self.adapter_name
            .as_deref()
            .is_none_or(|v| v == template.adapter_name)
            && self.platform.as_deref().is_none_or(|v| v == template.platform)
            && self.build_type.is_none_or(|v| v == build_type)
            && self.compiler.is_none_or(|v| v == compiler)
            && self.static_loader.is_none_or(|v| v == template.static_loader)
            && self.static_adapter.is_none_or(|v| v == template.static_adapter)
    }
}
