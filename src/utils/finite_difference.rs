//! Finite difference checks for parameter derivatives.
//!
//! A wrong chain-rule factor silently corrupts every gradient the optimizer
//! sees, so this module compares a parameter's analytical derivatives against
//! numerical approximations of its value function.

use crate::parameters::Parameter;

/// Default step size for first-derivative differences.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default step size for second-derivative differences.
pub const DEFAULT_SECOND_EPSILON: f64 = 1e-4;

/// Approximate `d(get_val)/dx` with a forward difference.
pub fn forward_derivative(param: &Parameter, x: f64, epsilon: Option<f64>) -> f64 {
    let h = epsilon.unwrap_or(DEFAULT_EPSILON);
    (param.get_val(x + h) - param.get_val(x)) / h
}

/// Approximate `d(get_val)/dx` with a central difference.
pub fn central_derivative(param: &Parameter, x: f64, epsilon: Option<f64>) -> f64 {
    let h = epsilon.unwrap_or(DEFAULT_EPSILON);
    (param.get_val(x + h) - param.get_val(x - h)) / (2.0 * h)
}

/// Approximate `d²(get_val)/dx²` with a central difference.
pub fn central_second_derivative(param: &Parameter, x: f64, epsilon: Option<f64>) -> f64 {
    let h = epsilon.unwrap_or(DEFAULT_SECOND_EPSILON);
    (param.get_val(x + h) - 2.0 * param.get_val(x) + param.get_val(x - h)) / (h * h)
}

/// Worst-case agreement between analytical and numerical derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeCheck {
    /// Name of the checked parameter
    pub name: String,

    /// Number of sample points
    pub samples: usize,

    /// Largest `|get_deriv(x, 1) - central difference|`
    pub max_first_error: f64,

    /// Sample point where the first-derivative error was largest
    pub worst_first_x: f64,

    /// Largest `|get_second_deriv(x, 1, 0) - central second difference|`
    pub max_second_error: f64,

    /// Sample point where the second-derivative error was largest
    pub worst_second_x: f64,
}

impl DerivativeCheck {
    /// Whether both errors are within `tolerance`.
    pub fn passes(&self, tolerance: f64) -> bool {
        self.max_first_error <= tolerance && self.max_second_error <= tolerance
    }
}

/// Compare a parameter's analytical derivatives against central differences.
///
/// # Arguments
///
/// * `param` - The parameter to check
/// * `xs` - Internal values to sample
/// * `epsilon` - Step size for the first derivative (optional); the second
///   derivative uses [`DEFAULT_SECOND_EPSILON`] unless this is larger
///
/// # Examples
///
/// ```
/// use reparam_rs::parameters::Parameter;
/// use reparam_rs::utils::finite_difference::check_derivatives;
///
/// let param = Parameter::bounded("a", 5.0, 0.0, 10.0).build().unwrap();
/// let report = check_derivatives(&param, &[-2.0, 0.0, 1.0, 3.5], None);
/// assert!(report.passes(1e-4));
/// ```
pub fn check_derivatives(param: &Parameter, xs: &[f64], epsilon: Option<f64>) -> DerivativeCheck {
    let h1 = epsilon.unwrap_or(DEFAULT_EPSILON);
    let h2 = h1.max(DEFAULT_SECOND_EPSILON);

    let mut report = DerivativeCheck {
        name: param.name().to_string(),
        samples: xs.len(),
        max_first_error: 0.0,
        worst_first_x: f64::NAN,
        max_second_error: 0.0,
        worst_second_x: f64::NAN,
    };

    for &x in xs {
        let first_error = (param.get_deriv(x, 1.0) - central_derivative(param, x, Some(h1))).abs();
        if first_error >= report.max_first_error {
            report.max_first_error = first_error;
            report.worst_first_x = x;
        }

        let second_error = (param.get_second_deriv(x, 1.0, 0.0)
            - central_second_derivative(param, x, Some(h2)))
        .abs();
        if second_error >= report.max_second_error {
            report.max_second_error = second_error;
            report.worst_second_x = x;
        }
    }

    report
}
