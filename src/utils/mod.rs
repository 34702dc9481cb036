//! Utility functions and helpers for the reparam-rs library.

pub mod finite_difference;
pub mod parallel;

// Re-export commonly used utilities
pub use finite_difference::{check_derivatives, DerivativeCheck};
pub use parallel::{restraint_gradient_parallel, scale_gradient_parallel, values_parallel};
