//! # Parameter System
//!
//! This module provides the bounded-parameter reparameterization used by
//! gradient-based refinement. Every physically bounded quantity (cell lengths,
//! detector offsets, scale factors) is exposed to the optimizer as an
//! unconstrained internal variable `x`, and the parameter supplies the physical
//! value, chain-rule factors and restraint terms the optimizer needs.
//!
//! ## Key Features
//!
//! - **Sinusoidal Reparameterization**: `x = 1` reproduces the initial value and
//!   every `x` maps into `[minval, maxval]`
//! - **Passthrough Parameters**: identity mapping for naturally unconstrained quantities
//! - **Fixed Parameters**: pinned to their initial value regardless of `x`
//! - **Gaussian Restraints**: soft priors with value, gradient and curvature in internal space
//! - **Ordered Registry**: dense, insertion-ordered positions (`xpos`) for flat vectors
//!
//! ## Core Components
//!
//! - [`Parameter`] and [`ParameterBuilder`]: one refinement scalar
//! - [`ParameterRegistry`]: the ordered collection handed to the optimizer
//! - [`Bounds`] and [`SinusoidalTransform`]: the bounded substitution
//! - [`GaussianRestraint`]: the soft-prior math in physical space
//!
//! ## Example Usage
//!
//! ```rust
//! use reparam_rs::parameters::{Parameter, ParameterRegistry};
//!
//! let mut registry = ParameterRegistry::new();
//! registry
//!     .add(Parameter::bounded("a_len", 79.1, 78.0, 80.0).sigma(0.1).build().unwrap())
//!     .unwrap();
//! registry
//!     .add(
//!         Parameter::bounded("spot_scale", 1.0, 0.1, 10.0)
//!             .restraint(1.0, 0.05)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! // The optimizer starts from the reference point
//! let x = registry.reference_point();
//! let values = registry.values(&x).unwrap();
//! assert!((values[0] - 79.1).abs() < 1e-10);
//!
//! // Gradients from the forward model are mapped into internal space
//! let grad = registry.scale_gradient(&x, &values).unwrap();
//! assert_eq!(grad.len(), 2);
//! ```

pub mod bounds;
pub mod parameter;
pub mod registry;
pub mod restraint;


// Re-export key types
pub use bounds::{Bounds, BoundsError, SinusoidalTransform, FIXED_HALF_WIDTH};
pub use parameter::{ConfigurationError, Parameter, ParameterBuilder, ParameterKind};
pub use registry::ParameterRegistry;
pub use restraint::GaussianRestraint;
