//! Matrix axes: the build-type and compiler dimensions.
//!
//! Both axes are fixed at authoring time; a job template is expanded against
//! their cartesian product.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Build configuration passed to the build system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A C/C++ compiler pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Gcc,
    Clang,
}

impl Compiler {
    /// C compiler executable name.
    pub fn cc(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Clang => "clang",
        }
    }

    /// C++ compiler executable name.
    pub fn cxx(&self) -> &'static str {
        match self {
            Compiler::Gcc => "g++",
            Compiler::Clang => "clang++",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cc())
    }
}

/// The two enumerations a template is expanded against.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AxisSet {
    #[serde(default = "default_build_types")]
    pub build_types: Vec<BuildType>,
    #[serde(default = "default_compilers")]
    pub compilers: Vec<Compiler>,
}

fn default_build_types() -> Vec<BuildType> {
    vec![BuildType::Debug, BuildType::Release]
}

fn default_compilers() -> Vec<Compiler> {
    vec![Compiler::Gcc, Compiler::Clang]
}

impl Default for AxisSet {
    fn default() -> Self {
        Self {
            build_types: default_build_types(),
            compilers: default_compilers(),
        }
    }
}

impl AxisSet {
    /// Number of candidate combinations before exclusion rules apply.
    pub fn combination_count(&self) -> usize {
        self.build_types.len() * self.compilers.len()
    }
}
