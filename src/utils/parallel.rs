//! Parallel evaluation of registry-wide quantities.
//!
//! Parameters are immutable once registered, so per-parameter evaluation can
//! be spread across Rayon's thread pool without synchronization. These
//! functions return the same vectors as their sequential counterparts on
//! [`ParameterRegistry`].

use ndarray::Array1;
use rayon::prelude::*;

use crate::error::Result;
use crate::parameters::ParameterRegistry;

/// Physical values for the internal vector `x`, computed in parallel.
pub fn values_parallel(registry: &ParameterRegistry, x: &Array1<f64>) -> Result<Array1<f64>> {
    registry.check_len("internal values", x.len())?;
    let values: Vec<f64> = registry
        .as_slice()
        .par_iter()
        .map(|p| p.get_val(x[p.xpos()]))
        .collect();
    Ok(Array1::from_vec(values))
}

/// Gradient conversion into internal-variable space, computed in parallel.
pub fn scale_gradient_parallel(
    registry: &ParameterRegistry,
    x: &Array1<f64>,
    grad: &Array1<f64>,
) -> Result<Array1<f64>> {
    registry.check_len("internal values", x.len())?;
    registry.check_len("gradient", grad.len())?;
    let scaled: Vec<f64> = registry
        .as_slice()
        .par_iter()
        .map(|p| p.get_deriv(x[p.xpos()], grad[p.xpos()]))
        .collect();
    Ok(Array1::from_vec(scaled))
}

/// Restraint gradient in internal-variable space, computed in parallel.
pub fn restraint_gradient_parallel(
    registry: &ParameterRegistry,
    x: &Array1<f64>,
) -> Result<Array1<f64>> {
    registry.check_len("internal values", x.len())?;
    let grad = registry
        .as_slice()
        .par_iter()
        .map(|p| {
            if p.has_restraint() {
                p.get_restraint_deriv(x[p.xpos()])
            } else {
                Ok(0.0)
            }
        })
        .collect::<std::result::Result<Vec<f64>, _>>()?;
    Ok(Array1::from_vec(grad))
}
