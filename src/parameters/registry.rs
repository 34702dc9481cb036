//! Parameter registry implementation
//!
//! The registry is the ordered collection of every parameter in a refinement.
//! Insertion order is meaningful: each parameter's `xpos` is its position in
//! the optimizer's flat internal, gradient and curvature vectors.

use crate::error::{ReparamError, Result};
use crate::parameters::parameter::{ConfigurationError, Parameter};
use ndarray::Array1;
use std::collections::HashMap;
use tracing::{debug, warn};

/// An append-only, insertion-ordered collection of named parameters
///
/// Parameters are stored in a sequence indexed by `xpos`, paired with a
/// name-to-position lookup table.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl ParameterRegistry {
    /// Create a new empty registry
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::ParameterRegistry;
    ///
    /// let registry = ParameterRegistry::new();
    /// assert_eq!(registry.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter, assigning it the next position
    ///
    /// # Returns
    ///
    /// The assigned `xpos`, or [`ConfigurationError::DuplicateName`] if a
    /// parameter with the same name is already registered
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::{Parameter, ParameterRegistry};
    ///
    /// let mut registry = ParameterRegistry::new();
    /// let a = registry.add(Parameter::bounded("a", 5.0, 0.0, 10.0).build().unwrap()).unwrap();
    /// let b = registry.add(Parameter::passthrough("b", 0.0).build().unwrap()).unwrap();
    /// assert_eq!((a, b), (0, 1));
    /// assert!(registry.add(Parameter::builder("a").build().unwrap()).is_err());
    /// ```
    pub fn add(&mut self, mut param: Parameter) -> std::result::Result<usize, ConfigurationError> {
        if self.index.contains_key(param.name()) {
            return Err(ConfigurationError::DuplicateName {
                name: param.name().to_string(),
            });
        }

        let xpos = self.params.len();
        param.set_xpos(xpos);
        debug!(
            name = param.name(),
            xpos,
            kind = ?param.kind(),
            fixed = param.is_fixed(),
            "registered parameter"
        );

        self.index.insert(param.name().to_string(), xpos);
        self.params.push(param);
        Ok(xpos)
    }

    /// Replace a registered parameter with a new definition of the same name
    ///
    /// The replacement inherits the existing `xpos`, so positions stay dense.
    ///
    /// # Returns
    ///
    /// The inherited `xpos`, or [`ReparamError::ParameterNotFound`] if no
    /// parameter with that name is registered
    pub fn replace(&mut self, mut param: Parameter) -> Result<usize> {
        let xpos = *self
            .index
            .get(param.name())
            .ok_or_else(|| ReparamError::ParameterNotFound(param.name().to_string()))?;

        warn!(name = param.name(), xpos, "replacing registered parameter");
        param.set_xpos(xpos);
        self.params[xpos] = param;
        Ok(xpos)
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    /// Get a parameter by its position
    pub fn get_by_xpos(&self, xpos: usize) -> Option<&Parameter> {
        self.params.get(xpos)
    }

    /// Position of the named parameter
    pub fn xpos(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate over the parameters in insertion (`xpos`) order
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// The parameters as a slice indexed by `xpos`
    pub fn as_slice(&self) -> &[Parameter] {
        &self.params
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    /// Parameters that are refined
    pub fn free(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.refine())
    }

    /// Parameters that are held fixed
    pub fn fixed(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.is_fixed())
    }

    /// Internal vector reproducing every parameter's initial value
    pub fn reference_point(&self) -> Array1<f64> {
        Array1::ones(self.len())
    }

    /// Internal vector reproducing the given physical values
    ///
    /// # Arguments
    ///
    /// * `values` - Physical values indexed by `xpos`
    pub fn to_internal(&self, values: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("physical values", values.len())?;
        let internal = self
            .params
            .iter()
            .zip(values.iter())
            .map(|(p, &v)| p.to_internal(v))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Array1::from_vec(internal))
    }

    /// Physical values for the internal vector `x`
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::parameters::{Parameter, ParameterRegistry};
    ///
    /// let mut registry = ParameterRegistry::new();
    /// registry.add(Parameter::bounded("a", 5.0, 0.0, 10.0).build().unwrap()).unwrap();
    /// registry.add(Parameter::passthrough("b", 2.0).build().unwrap()).unwrap();
    ///
    /// let values = registry.values(&registry.reference_point()).unwrap();
    /// assert!((values[0] - 5.0).abs() < 1e-12);
    /// assert_eq!(values[1], 1.0);
    /// ```
    pub fn values(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("internal values", x.len())?;
        Ok(Array1::from_iter(
            self.params.iter().zip(x.iter()).map(|(p, &xi)| p.get_val(xi)),
        ))
    }

    /// Convert a gradient with respect to the physical values into one with
    /// respect to the internal variables
    pub fn scale_gradient(&self, x: &Array1<f64>, grad: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("internal values", x.len())?;
        self.check_len("gradient", grad.len())?;
        Ok(Array1::from_iter(
            self.params
                .iter()
                .zip(x.iter().zip(grad.iter()))
                .map(|(p, (&xi, &gi))| p.get_deriv(xi, gi)),
        ))
    }

    /// Convert diagonal curvature terms into internal-variable space
    ///
    /// # Arguments
    ///
    /// * `x` - Internal values
    /// * `grad` - First derivatives with respect to the physical values
    /// * `curv` - Second derivatives with respect to the physical values
    pub fn scale_second_derivs(
        &self,
        x: &Array1<f64>,
        grad: &Array1<f64>,
        curv: &Array1<f64>,
    ) -> Result<Array1<f64>> {
        self.check_len("internal values", x.len())?;
        self.check_len("gradient", grad.len())?;
        self.check_len("curvature", curv.len())?;
        Ok(Array1::from_iter(self.params.iter().enumerate().map(
            |(i, p)| p.get_second_deriv(x[i], grad[i], curv[i]),
        )))
    }

    /// Total restraint penalty at `x`
    ///
    /// Only parameters that carry a restraint contribute; fixed ones contribute zero.
    pub fn restraint_value(&self, x: &Array1<f64>) -> Result<f64> {
        self.check_len("internal values", x.len())?;
        let mut total = 0.0;
        for (p, &xi) in self.params.iter().zip(x.iter()) {
            if p.has_restraint() {
                total += p.get_restraint_val(xi)?;
            }
        }
        Ok(total)
    }

    /// Gradient of the total restraint penalty with respect to the internal variables
    pub fn restraint_gradient(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len("internal values", x.len())?;
        let mut grad = Array1::zeros(self.len());
        for (p, &xi) in self.params.iter().zip(x.iter()) {
            if p.has_restraint() {
                grad[p.xpos()] = p.get_restraint_deriv(xi)?;
            }
        }
        Ok(grad)
    }

    pub(crate) fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.len() {
            return Err(ReparamError::DimensionMismatch(format!(
                "Expected {} {} for {} parameters, got {}",
                self.len(),
                what,
                self.len(),
                len
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ParameterRegistry {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
