//! # reparam-rs
//!
//! `reparam-rs` provides the per-parameter primitives a gradient-based
//! diffraction-image refinement needs: each physically bounded quantity is
//! mapped onto an unconstrained internal variable, with matching first and
//! second derivatives and optional Gaussian restraints.
//!
//! The library provides:
//! - Bounded (sinusoidal) and passthrough parameters with a shared contract
//! - Gaussian restraint (soft prior) terms mapped through the same chain rule
//! - An insertion-ordered registry assigning each parameter its vector position
//! - JSON configuration for parameter definitions
//! - Finite-difference derivative checks and parallel evaluation helpers
//!
//! ## Basic Usage
//!
//! ```
//! use reparam_rs::parameters::{Parameter, ParameterRegistry};
//!
//! let mut registry = ParameterRegistry::new();
//! registry.add(Parameter::bounded("a_len", 5.0, 0.0, 10.0).build().unwrap()).unwrap();
//!
//! let param = registry.get("a_len").unwrap();
//! assert!((param.get_val(1.0) - 5.0).abs() < 1e-12);
//! ```

// Public modules
pub mod config;
pub mod error;

// Parameter system
pub mod parameters;

pub mod utils;

// Re-exports for convenience
pub use config::{ParameterConfig, RefinementConfig};
pub use error::{ReparamError, Result};
pub use parameters::{ConfigurationError, Parameter, ParameterBuilder, ParameterKind, ParameterRegistry};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
