//! Matrix resolution for Crucible CI.
//!
//! Expands one job template against the build-type and compiler axes, filters
//! the candidates through wildcard exclusion rules, and hands the execution
//! layer a fully resolved set of job instances.

pub mod resolver;
pub mod rules;

pub use resolver::MatrixResolver;
pub use rules::default_rules;
