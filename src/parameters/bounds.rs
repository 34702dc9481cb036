//! Parameter bounds implementation
//!
//! This module provides the physical bounds of a refinement parameter and the
//! sinusoidal reparameterization that maps an unconstrained internal variable
//! onto those bounds. The internal variable is anchored so that `x = 1`
//! reproduces the parameter's initial value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Half-width of the degenerate interval used to pin a fixed parameter.
pub const FIXED_HALF_WIDTH: f64 = 1e-10;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must be less than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },
}

/// The physical interval a parameter is constrained to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum allowed value for the parameter
    pub min: f64,

    /// Maximum allowed value for the parameter
    pub max: f64,
}

impl Bounds {
    /// Create new bounds with min and max values
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum allowed value for the parameter
    /// * `max` - Maximum allowed value for the parameter
    ///
    /// # Returns
    ///
    /// A new `Bounds` object if both ends and the width are finite and `min < max`,
    /// or an error otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::bounds::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert_eq!(bounds.range(), 10.0);
    /// assert!(Bounds::new(1.0, 1.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        // NaN fails this comparison too
        if !(min < max) || !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Create the degenerate interval that pins a fixed parameter to `init`
    ///
    /// The half-width is [`FIXED_HALF_WIDTH`], widened to one relative machine
    /// epsilon for large magnitudes so the interval never collapses to a point.
    pub fn fixed_window(init: f64) -> Result<Self, BoundsError> {
        let half_width = FIXED_HALF_WIDTH.max(init.abs() * f64::EPSILON);
        Self::new(init - half_width, init + half_width)
    }

    /// Width of the interval, `max - min`
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within the bounds (inclusive)
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// The sinusoidal substitution mapping an internal variable onto `[min, max]`
///
/// `physical = min + range/2 * (1 + sin(sigma * (x - 1) + arcsin_term))`
///
/// where `arcsin_term = asin(2 * (init - min) / range - 1)` is computed once at
/// construction, so `x = 1` maps back onto `init`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinusoidalTransform {
    bounds: Bounds,
    sigma: f64,
    arcsin_term: f64,
}

impl SinusoidalTransform {
    /// Create a new transform anchored at `init`
    ///
    /// # Arguments
    ///
    /// * `bounds` - Validated physical bounds
    /// * `init` - Physical value reproduced at the reference point `x = 1`
    /// * `sigma` - Refinement sensitivity (angular frequency of the substitution)
    ///
    /// # Returns
    ///
    /// The transform, or an error if `init` lies outside the bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::bounds::{Bounds, SinusoidalTransform};
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// let transform = SinusoidalTransform::new(bounds, 5.0, 1.0).unwrap();
    /// assert!((transform.value(1.0) - 5.0).abs() < 1e-12);
    /// ```
    pub fn new(bounds: Bounds, init: f64, sigma: f64) -> Result<Self, BoundsError> {
        let scaled = 2.0 * (init - bounds.min) / bounds.range() - 1.0;
        if !(-1.0..=1.0).contains(&scaled) {
            return Err(BoundsError::ValueOutsideBounds {
                value: init,
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(Self {
            bounds,
            sigma,
            arcsin_term: scaled.asin(),
        })
    }

    /// The phase offset that anchors `x = 1` onto the initial value
    pub fn arcsin_term(&self) -> f64 {
        self.arcsin_term
    }

    /// The bounds this transform maps onto
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    fn phase(&self, x: f64) -> f64 {
        self.sigma * (x - 1.0) + self.arcsin_term
    }

    #[inline]
    fn half_range(&self) -> f64 {
        self.bounds.range() / 2.0
    }

    /// Physical value for the internal variable `x`
    pub fn value(&self, x: f64) -> f64 {
        let value = self.bounds.min + self.half_range() * (1.0 + self.phase(x).sin());
        // rounding in min + range can land one ulp past max
        self.bounds.clamp(value)
    }

    /// `d(physical)/dx` at `x`
    pub fn first_derivative(&self, x: f64) -> f64 {
        self.half_range() * self.phase(x).cos() * self.sigma
    }

    /// `d²(physical)/dx²` at `x`
    pub fn second_derivative(&self, x: f64) -> f64 {
        -self.phase(x).sin() * self.sigma * self.sigma * self.half_range()
    }

    /// Internal variable that maps onto `value`, on the branch containing `x = 1`
    ///
    /// Useful to restart a refinement from a previously refined physical value.
    pub fn to_internal(&self, value: f64) -> Result<f64, BoundsError> {
        if !self.bounds.is_within_bounds(value) {
            return Err(BoundsError::ValueOutsideBounds {
                value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }

        let scaled = (2.0 * (value - self.bounds.min) / self.bounds.range() - 1.0).clamp(-1.0, 1.0);
        Ok(1.0 + (scaled.asin() - self.arcsin_term) / self.sigma)
    }
}
