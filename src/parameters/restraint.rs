//! Gaussian restraints (soft priors) on physical parameter values
//!
//! A restraint contributes the negative log density of a normal prior to the
//! refinement objective. The terms here are expressed in physical space; the
//! owning [`Parameter`](crate::parameters::Parameter) maps them into internal
//! space through its own chain rule.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A normal prior with mean `center` and variance `beta`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianRestraint {
    /// Restraint target
    pub center: f64,

    /// Restraint variance; smaller values give tighter restraints
    pub beta: f64,
}

impl GaussianRestraint {
    /// Create a new restraint
    ///
    /// `beta` is expected to be positive; [`ParameterBuilder`](crate::parameters::ParameterBuilder)
    /// validates it before a restraint is ever evaluated.
    pub fn new(center: f64, beta: f64) -> Self {
        Self { center, beta }
    }

    /// Negative log density at `physical`:
    /// `0.5 * (ln(2π·beta) + (center - physical)² / beta)`
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::GaussianRestraint;
    ///
    /// let restraint = GaussianRestraint::new(5.0, 0.01);
    /// let at_center = restraint.value(5.0);
    /// assert!((restraint.value(6.0) - at_center - 50.0).abs() < 1e-9);
    /// ```
    pub fn value(&self, physical: f64) -> f64 {
        let dist = self.center - physical;
        0.5 * ((2.0 * PI * self.beta).ln() + dist * dist / self.beta)
    }

    /// Derivative of [`value`](Self::value) with respect to the physical value
    pub fn physical_gradient(&self, physical: f64) -> f64 {
        -(self.center - physical) / self.beta
    }

    /// Second derivative of [`value`](Self::value) with respect to the physical value
    pub fn physical_curvature(&self) -> f64 {
        1.0 / self.beta
    }
}
