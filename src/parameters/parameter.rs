//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, the per-scalar building block of
//! a refinement. A parameter owns its physical bounds, refinement sensitivity,
//! fixed flag and optional restraint, and converts between the optimizer's
//! unconstrained internal variable and the physical value seen by the forward
//! model.

use crate::parameters::bounds::{Bounds, BoundsError, SinusoidalTransform};
use crate::parameters::restraint::GaussianRestraint;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Errors caused by an invalid parameter configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Parameter '{name}': minval ({min}) must be less than maxval ({max})")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("Parameter '{name}': initial value {init} is outside bounds [{min}, {max}]")]
    InitOutsideBounds {
        name: String,
        init: f64,
        min: f64,
        max: f64,
    },

    #[error("Parameter '{name}': value {value} is outside bounds [{min}, {max}]")]
    ValueOutsideBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Parameter '{name}': sigma must be positive and finite, got {sigma}")]
    InvalidSigma { name: String, sigma: f64 },

    #[error("Parameter '{name}': restraint variance beta must be positive and finite, got {beta}")]
    InvalidBeta { name: String, beta: f64 },

    #[error("Parameter '{name}': restraint requested without beta")]
    MissingBeta { name: String },

    #[error("Parameter '{name}': restraint requested without center")]
    MissingCenter { name: String },

    #[error("Parameter '{name}' is already registered")]
    DuplicateName { name: String },
}

impl ConfigurationError {
    fn from_bounds(name: &str, init: f64, err: BoundsError) -> Self {
        match err {
            BoundsError::InvalidBounds { min, max } => ConfigurationError::InvalidBounds {
                name: name.to_string(),
                min,
                max,
            },
            BoundsError::ValueOutsideBounds { min, max, .. } => {
                ConfigurationError::InitOutsideBounds {
                    name: name.to_string(),
                    init,
                    min,
                    max,
                }
            }
        }
    }
}

/// How the internal variable maps onto the physical value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Sinusoidal substitution confined to `[minval, maxval]`
    #[default]
    Bounded,

    /// Identity: the physical value is the internal variable
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transform {
    Sinusoidal(SinusoidalTransform),
    Identity,
}

/// A refinement parameter
///
/// Parameters are built once through [`ParameterBuilder`], registered in a
/// [`ParameterRegistry`](crate::parameters::ParameterRegistry) (which assigns
/// `xpos`), and from then on only queried. All queries are pure functions of
/// their arguments, so a parameter can be shared across threads freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    init: f64,
    minval: f64,
    maxval: f64,
    sigma: f64,
    fix: bool,
    center: Option<f64>,
    beta: Option<f64>,
    xpos: usize,
    kind: ParameterKind,
    transform: Transform,
}

impl Parameter {
    /// Start building a parameter with the given name and default settings
    ///
    /// Defaults: `init = 0`, `minval = -1`, `maxval = 1`, `sigma = 1`, free,
    /// no restraint, bounded.
    pub fn builder(name: &str) -> ParameterBuilder {
        ParameterBuilder::new(name)
    }

    /// Start building a bounded parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::Parameter;
    ///
    /// let param = Parameter::bounded("a_len", 5.0, 0.0, 10.0).build().unwrap();
    /// assert!((param.get_val(1.0) - 5.0).abs() < 1e-12);
    /// assert!(param.get_deriv(1.0, 1.0) > 0.0);
    /// ```
    pub fn bounded(name: &str, init: f64, minval: f64, maxval: f64) -> ParameterBuilder {
        ParameterBuilder::new(name).init(init).bounds(minval, maxval)
    }

    /// Start building a passthrough parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::Parameter;
    ///
    /// let param = Parameter::passthrough("offset", 0.0).build().unwrap();
    /// assert_eq!(param.get_val(-3.5), -3.5);
    /// assert_eq!(param.get_deriv(-3.5, 2.0), 2.0);
    /// ```
    pub fn passthrough(name: &str, init: f64) -> ParameterBuilder {
        ParameterBuilder::new(name)
            .init(init)
            .kind(ParameterKind::Passthrough)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn init(&self) -> f64 {
        self.init
    }

    /// Effective lower bound (the pinning window for fixed bounded parameters)
    ///
    /// Passthrough parameters report the configured value as given.
    pub fn minval(&self) -> f64 {
        self.minval
    }

    /// Effective upper bound (the pinning window for fixed bounded parameters)
    pub fn maxval(&self) -> f64 {
        self.maxval
    }

    /// Validated bounds of the substitution, `None` for passthrough parameters
    pub fn bounds(&self) -> Option<&Bounds> {
        match &self.transform {
            Transform::Sinusoidal(t) => Some(t.bounds()),
            Transform::Identity => None,
        }
    }

    /// `maxval - minval`
    pub fn range(&self) -> f64 {
        self.maxval - self.minval
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn is_fixed(&self) -> bool {
        self.fix
    }

    /// Whether the parameter is refined; gates the restraint terms
    pub fn refine(&self) -> bool {
        !self.fix
    }

    pub fn center(&self) -> Option<f64> {
        self.center
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Position in the optimizer's flat vectors, assigned on registration
    pub fn xpos(&self) -> usize {
        self.xpos
    }

    pub(crate) fn set_xpos(&mut self, xpos: usize) {
        self.xpos = xpos;
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Phase offset of the sinusoidal substitution, `None` for passthrough parameters
    pub fn arcsin_term(&self) -> Option<f64> {
        match &self.transform {
            Transform::Sinusoidal(t) => Some(t.arcsin_term()),
            Transform::Identity => None,
        }
    }

    /// Whether a restraint (center or beta) has been configured
    pub fn has_restraint(&self) -> bool {
        self.center.is_some() || self.beta.is_some()
    }

    /// Physical value for the internal variable `x`
    pub fn get_val(&self, x: f64) -> f64 {
        match &self.transform {
            Transform::Sinusoidal(t) => t.value(x),
            Transform::Identity => x,
        }
    }

    /// Chain rule: converts `deriv`, taken with respect to the physical value,
    /// into a derivative with respect to `x`
    pub fn get_deriv(&self, x: f64, deriv: f64) -> f64 {
        match &self.transform {
            Transform::Sinusoidal(t) => deriv * t.first_derivative(x),
            Transform::Identity => deriv,
        }
    }

    /// Second-order chain rule:
    /// `(dθ/dx)² * second_deriv + d²θ/dx² * deriv`
    pub fn get_second_deriv(&self, x: f64, deriv: f64, second_deriv: f64) -> f64 {
        match &self.transform {
            Transform::Sinusoidal(t) => {
                let dtheta_dx = t.first_derivative(x);
                dtheta_dx * dtheta_dx * second_deriv + t.second_derivative(x) * deriv
            }
            Transform::Identity => second_deriv,
        }
    }

    /// The configured restraint, or an error if only half of it is present
    pub fn restraint(&self) -> Result<GaussianRestraint, ConfigurationError> {
        let beta = self.beta.ok_or_else(|| ConfigurationError::MissingBeta {
            name: self.name.clone(),
        })?;
        let center = self.center.ok_or_else(|| ConfigurationError::MissingCenter {
            name: self.name.clone(),
        })?;
        Ok(GaussianRestraint::new(center, beta))
    }

    /// Restraint penalty at `x`; zero for fixed parameters
    pub fn get_restraint_val(&self, x: f64) -> Result<f64, ConfigurationError> {
        if !self.refine() {
            return Ok(0.0);
        }
        let restraint = self.restraint()?;
        Ok(restraint.value(self.get_val(x)))
    }

    /// Derivative of the restraint penalty with respect to `x`; zero for fixed parameters
    ///
    /// The physical-space gradient goes through [`get_deriv`](Self::get_deriv)
    /// like every other gradient term.
    pub fn get_restraint_deriv(&self, x: f64) -> Result<f64, ConfigurationError> {
        if !self.refine() {
            return Ok(0.0);
        }
        let restraint = self.restraint()?;
        let val = self.get_val(x);
        Ok(self.get_deriv(x, restraint.physical_gradient(val)))
    }

    /// Second derivative of the restraint penalty with respect to `x`; zero for fixed parameters
    pub fn get_restraint_second_deriv(&self, x: f64) -> Result<f64, ConfigurationError> {
        if !self.refine() {
            return Ok(0.0);
        }
        let restraint = self.restraint()?;
        let val = self.get_val(x);
        Ok(self.get_second_deriv(
            x,
            restraint.physical_gradient(val),
            restraint.physical_curvature(),
        ))
    }

    /// Internal variable that reproduces `value`
    ///
    /// For bounded parameters the result lies on the branch of the substitution
    /// that contains the reference point `x = 1`.
    pub fn to_internal(&self, value: f64) -> Result<f64, ConfigurationError> {
        match &self.transform {
            Transform::Sinusoidal(t) => t.to_internal(value).map_err(|e| match e {
                BoundsError::ValueOutsideBounds { value, min, max } => {
                    ConfigurationError::ValueOutsideBounds {
                        name: self.name.clone(),
                        value,
                        min,
                        max,
                    }
                }
                other => ConfigurationError::from_bounds(&self.name, value, other),
            }),
            Transform::Identity => Ok(value),
        }
    }
}

/// Builder collecting a parameter's settings before validation
///
/// Settings may be supplied in any order; [`build`](Self::build) validates them
/// once and freezes the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBuilder {
    name: String,
    init: f64,
    minval: f64,
    maxval: f64,
    sigma: f64,
    fix: bool,
    center: Option<f64>,
    beta: Option<f64>,
    kind: ParameterKind,
}

impl ParameterBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            init: 0.0,
            minval: -1.0,
            maxval: 1.0,
            sigma: 1.0,
            fix: false,
            center: None,
            beta: None,
            kind: ParameterKind::Bounded,
        }
    }

    pub fn init(mut self, init: f64) -> Self {
        self.init = init;
        self
    }

    pub fn minval(mut self, minval: f64) -> Self {
        self.minval = minval;
        self
    }

    pub fn maxval(mut self, maxval: f64) -> Self {
        self.maxval = maxval;
        self
    }

    pub fn bounds(self, minval: f64, maxval: f64) -> Self {
        self.minval(minval).maxval(maxval)
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn fixed(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    pub fn center(mut self, center: f64) -> Self {
        self.center = Some(center);
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Set both halves of a Gaussian restraint
    pub fn restraint(self, center: f64, beta: f64) -> Self {
        self.center(center).beta(beta)
    }

    pub(crate) fn optional_restraint(mut self, center: Option<f64>, beta: Option<f64>) -> Self {
        self.center = center;
        self.beta = beta;
        self
    }

    pub fn kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Validate the settings and build the parameter
    ///
    /// Bounded parameters require finite bounds with `minval < maxval` and an
    /// `init` inside them. A fixed bounded parameter ignores the supplied
    /// bounds and is pinned to a window of half-width
    /// [`FIXED_HALF_WIDTH`](crate::parameters::bounds::FIXED_HALF_WIDTH)
    /// around `init`. Passthrough parameters keep their bounds unvalidated.
    pub fn build(self) -> Result<Parameter, ConfigurationError> {
        trace!(
            name = %self.name,
            init = self.init,
            minval = self.minval,
            maxval = self.maxval,
            sigma = self.sigma,
            fix = self.fix,
            "building parameter"
        );

        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(ConfigurationError::InvalidSigma {
                name: self.name,
                sigma: self.sigma,
            });
        }

        if let Some(beta) = self.beta {
            if !(beta > 0.0) || !beta.is_finite() {
                return Err(ConfigurationError::InvalidBeta {
                    name: self.name,
                    beta,
                });
            }
        }

        let ((minval, maxval), transform) = match self.kind {
            ParameterKind::Bounded => {
                let bounds = if self.fix {
                    Bounds::fixed_window(self.init)
                } else {
                    Bounds::new(self.minval, self.maxval)
                }
                .map_err(|e| ConfigurationError::from_bounds(&self.name, self.init, e))?;

                let transform = SinusoidalTransform::new(bounds, self.init, self.sigma)
                    .map_err(|e| ConfigurationError::from_bounds(&self.name, self.init, e))?;

                ((bounds.min, bounds.max), Transform::Sinusoidal(transform))
            }
            ParameterKind::Passthrough => ((self.minval, self.maxval), Transform::Identity),
        };

        Ok(Parameter {
            name: self.name,
            init: self.init,
            minval,
            maxval,
            sigma: self.sigma,
            fix: self.fix,
            center: self.center,
            beta: self.beta,
            xpos: 0,
            kind: self.kind,
            transform,
        })
    }
}
