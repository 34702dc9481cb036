//! A minimal optimizer loop driving a registry
//!
//! The toy objective is `sum_i (value_i - target_i)^2` plus restraints,
//! minimized by plain gradient descent on the internal variables.

use approx::assert_relative_eq;
use ndarray::{array, Array1};
use reparam_rs::parameters::{Parameter, ParameterRegistry};

fn toy_registry() -> ParameterRegistry {
    let mut registry = ParameterRegistry::new();
    for param in [
        Parameter::bounded("a", 2.0, 0.0, 10.0).sigma(0.1),
        Parameter::bounded("b", 5.0, 0.0, 10.0).sigma(0.1),
        Parameter::passthrough("eta", 0.0),
        Parameter::bounded("d", 1.0, 0.0, 10.0).fixed(true),
        Parameter::bounded("s", 1.0, 0.0, 10.0)
            .sigma(0.1)
            .restraint(2.0, 1.0),
    ] {
        registry.add(param.build().unwrap()).unwrap();
    }
    registry
}

fn objective(registry: &ParameterRegistry, x: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    let theta = registry.values(x).unwrap();
    let misfit: f64 = (&theta - targets).mapv(|r| r * r).sum();
    misfit + registry.restraint_value(x).unwrap()
}

fn descend(registry: &ParameterRegistry, targets: &Array1<f64>, iterations: usize) -> Array1<f64> {
    let mut x = registry.reference_point();
    for _ in 0..iterations {
        let theta = registry.values(&x).unwrap();
        let grad_phys = (&theta - targets).mapv(|r| 2.0 * r);
        let mut grad = registry.scale_gradient(&x, &grad_phys).unwrap();
        grad += &registry.restraint_gradient(&x).unwrap();
        x.scaled_add(-0.5, &grad);
    }
    x
}

#[test]
fn test_gradient_descent_respects_bounds_and_restraints() {
    let registry = toy_registry();
    let targets = array![7.0, 15.0, -3.0, 100.0, 4.0];

    let start = objective(&registry, &registry.reference_point(), &targets);
    let x = descend(&registry, &targets, 2000);
    let theta = registry.values(&x).unwrap();

    // reachable target
    assert_relative_eq!(theta[0], 7.0, epsilon = 1e-6);
    // target beyond maxval: pushed against the bound, never past it
    assert!(theta[1] > 9.99 && theta[1] <= 10.0, "b = {}", theta[1]);
    // passthrough is unconstrained
    assert_relative_eq!(theta[2], -3.0, epsilon = 1e-9);
    // fixed parameter never moves
    assert!((theta[3] - 1.0).abs() <= 1e-10);
    // misfit and restraint balance: 2(s - 4) + (s - 2) = 0
    assert_relative_eq!(theta[4], 10.0 / 3.0, epsilon = 1e-6);

    assert!(objective(&registry, &x, &targets) < start);
}

#[test]
fn test_gauss_newton_step_with_scaled_curvature() {
    let registry = toy_registry();
    let targets = array![7.0, 5.0, -3.0, 1.0, 1.0];

    // Gauss-Newton drops the misfit term, leaving (dθ/dx)² * 2 as the curvature
    let mut x = registry.reference_point();
    for _ in 0..20 {
        let theta = registry.values(&x).unwrap();
        let grad_phys = (&theta - &targets).mapv(|r| 2.0 * r);
        let zeros = Array1::zeros(registry.len());
        let curv_phys = Array1::from_elem(registry.len(), 2.0);
        let grad = registry.scale_gradient(&x, &grad_phys).unwrap();
        let curv = registry.scale_second_derivs(&x, &zeros, &curv_phys).unwrap();
        for p in registry.free() {
            let i = p.xpos();
            if !p.has_restraint() && curv[i] > 0.0 {
                x[i] -= grad[i] / curv[i];
            }
        }
    }

    let theta = registry.values(&x).unwrap();
    assert_relative_eq!(theta[0], 7.0, epsilon = 1e-8);
    assert_relative_eq!(theta[1], 5.0, epsilon = 1e-10);
    assert_relative_eq!(theta[2], -3.0, epsilon = 1e-12);
}
