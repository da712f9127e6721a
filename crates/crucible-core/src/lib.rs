//! Crucible CI Core
//!
//! Core domain types and error handling for Crucible CI, a build-and-test
//! harness for hardware-backed runtime adapters. This crate has minimal
//! dependencies and defines the shared vocabulary used across all other
//! crates.

pub mod axes;
pub mod error;
pub mod exclusion;
pub mod ids;
pub mod instance;
pub mod stage;
pub mod template;

pub use error::{Error, Result};
pub use ids::*;
