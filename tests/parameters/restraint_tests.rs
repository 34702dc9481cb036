//! Integration tests for restraint terms

use crate::test_helpers::sample_points;
use approx::assert_relative_eq;
use reparam_rs::parameters::{ConfigurationError, GaussianRestraint, Parameter};
use std::f64::consts::PI;

#[test]
fn test_restraint_scenario() {
    // center = 5, beta = 0.01 evaluated at physical 5 and 6
    let param = Parameter::passthrough("scale", 5.0)
        .restraint(5.0, 0.01)
        .build()
        .unwrap();

    let at_center = param.get_restraint_val(5.0).unwrap();
    assert_relative_eq!(at_center, 0.5 * (2.0 * PI * 0.01).ln(), epsilon = 1e-12);

    let one_away = param.get_restraint_val(6.0).unwrap();
    assert_relative_eq!(one_away - at_center, 50.0, epsilon = 1e-9);
}

#[test]
fn test_restraint_scenario_bounded() {
    let param = Parameter::bounded("scale", 5.0, 0.0, 10.0)
        .restraint(5.0, 0.01)
        .build()
        .unwrap();
    let x6 = param.to_internal(6.0).unwrap();

    let at_center = param.get_restraint_val(1.0).unwrap();
    let one_away = param.get_restraint_val(x6).unwrap();
    assert_relative_eq!(at_center, 0.5 * (2.0 * PI * 0.01).ln(), epsilon = 1e-9);
    assert_relative_eq!(one_away - at_center, 50.0, epsilon = 1e-6);
}

#[test]
fn test_restraint_minimum_property() {
    let param = Parameter::bounded("c_len", 38.0, 37.0, 39.0)
        .sigma(0.2)
        .restraint(38.4, 0.02)
        .build()
        .unwrap();
    let x_center = param.to_internal(38.4).unwrap();
    let minimum = param.get_restraint_val(x_center).unwrap();

    for x in sample_points(21, 200, 20.0) {
        let val = param.get_restraint_val(x).unwrap();
        assert!(val >= minimum - 1e-12, "x = {}: {} < {}", x, val, minimum);
    }
}

#[test]
fn test_restraint_deriv_uses_parameter_chain_rule() {
    let param = Parameter::bounded("spot_scale", 1.0, 0.01, 100.0)
        .sigma(0.5)
        .restraint(2.0, 0.5)
        .build()
        .unwrap();
    let restraint = GaussianRestraint::new(2.0, 0.5);

    for x in sample_points(22, 30, 5.0) {
        let physical_grad = restraint.physical_gradient(param.get_val(x));
        assert_relative_eq!(
            param.get_restraint_deriv(x).unwrap(),
            param.get_deriv(x, physical_grad),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_fixed_parameter_zero_restraint() {
    let param = Parameter::bounded("detz_shift", 0.0, -1.0, 1.0)
        .fixed(true)
        .restraint(0.5, 1e-4)
        .build()
        .unwrap();

    for x in sample_points(23, 100, 1e3) {
        assert_eq!(param.get_restraint_val(x).unwrap(), 0.0);
        assert_eq!(param.get_restraint_deriv(x).unwrap(), 0.0);
        assert_eq!(param.get_restraint_second_deriv(x).unwrap(), 0.0);
    }
}

#[test]
fn test_missing_beta_is_an_error() {
    let param = Parameter::bounded("a", 5.0, 0.0, 10.0)
        .center(5.0)
        .build()
        .unwrap();

    let err = param.get_restraint_val(1.0).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MissingBeta {
            name: "a".to_string()
        }
    );
    assert!(err.to_string().contains("restraint requested without beta"));
    assert!(param.get_restraint_deriv(1.0).is_err());
    assert!(param.get_restraint_second_deriv(1.0).is_err());
}

#[test]
fn test_no_restraint_configured() {
    let param = Parameter::bounded("a", 5.0, 0.0, 10.0).build().unwrap();
    assert!(!param.has_restraint());
    // Asking for a restraint that was never configured still fails fast
    assert!(param.get_restraint_val(1.0).is_err());
}
