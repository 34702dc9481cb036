//! Configuration loading tests

use approx::assert_relative_eq;
use reparam_rs::config::{ParameterConfig, RefinementConfig};
use reparam_rs::error::ReparamError;
use reparam_rs::parameters::{ConfigurationError, ParameterKind};

const CELL_AND_DETECTOR: &str = r#"{
  "parameters": [
    { "name": "a_len", "init": 79.1, "minval": 78.0, "maxval": 80.5, "sigma": 0.1 },
    { "name": "c_len", "init": 38.0, "minval": 37.0, "maxval": 39.0, "sigma": 0.1,
      "center": 38.2, "beta": 0.01 },
    { "name": "detz_shift", "init": 0.0, "fix": true },
    { "name": "eta", "kind": "passthrough" }
  ]
}"#;

#[test]
fn test_build_registry_from_json() {
    let config = RefinementConfig::from_json(CELL_AND_DETECTOR).unwrap();
    assert_eq!(config.parameters.len(), 4);

    let registry = config.build_registry().unwrap();
    assert_eq!(registry.names(), vec!["a_len", "c_len", "detz_shift", "eta"]);
    assert_eq!(registry.get("eta").unwrap().kind(), ParameterKind::Passthrough);
    assert!(!registry.get("detz_shift").unwrap().refine());
    assert_eq!(registry.get("c_len").unwrap().beta(), Some(0.01));

    let values = registry.values(&registry.reference_point()).unwrap();
    assert_relative_eq!(values[0], 79.1, epsilon = 1e-10);
    assert_relative_eq!(values[1], 38.0, epsilon = 1e-10);
}

#[test]
fn test_save_and_load_json_file() {
    let config = RefinementConfig::from_json(CELL_AND_DETECTOR).unwrap();
    let path = std::env::temp_dir().join(format!(
        "reparam_rs_config_{}.json",
        std::process::id()
    ));

    config.save_json(&path).unwrap();
    let loaded = RefinementConfig::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("reparam_rs_does_not_exist.json");
    assert!(matches!(
        RefinementConfig::load_json(path),
        Err(ReparamError::IoError(_))
    ));
}

#[test]
fn test_invalid_definitions_abort_the_build() {
    let json = r#"{ "parameters": [
        { "name": "ok", "init": 0.5, "minval": 0.0, "maxval": 1.0 },
        { "name": "bad", "init": 0.5, "minval": 1.0, "maxval": 0.0 }
    ] }"#;
    let err = RefinementConfig::from_json(json)
        .unwrap()
        .build_registry()
        .unwrap_err();
    match err {
        ReparamError::Configuration(ConfigurationError::InvalidBounds { name, .. }) => {
            assert_eq!(name, "bad")
        }
        other => panic!("Expected InvalidBounds, got {:?}", other),
    }
}

#[test]
fn test_to_json_roundtrip_through_registry() {
    let registry = RefinementConfig::from_json(CELL_AND_DETECTOR)
        .unwrap()
        .build_registry()
        .unwrap();
    let json = RefinementConfig::from_registry(&registry).to_json().unwrap();
    let rebuilt = RefinementConfig::from_json(&json)
        .unwrap()
        .build_registry()
        .unwrap();

    for (a, b) in registry.iter().zip(rebuilt.iter()) {
        assert_eq!(a, b);
    }

    let single = ParameterConfig::from(registry.get("c_len").unwrap());
    assert_eq!(single.center, Some(38.2));
}
