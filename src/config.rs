//! Refinement parameter configuration
//!
//! Parameter definitions are usually supplied by the refinement's
//! configuration layer. This module provides the serde representation of
//! those definitions and builds a [`ParameterRegistry`] from them, preserving
//! the listed order.

use crate::error::Result;
use crate::parameters::{Parameter, ParameterKind, ParameterRegistry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

fn default_name() -> String {
    "param".to_string()
}

fn default_minval() -> f64 {
    -1.0
}

fn default_maxval() -> f64 {
    1.0
}

fn default_sigma() -> f64 {
    1.0
}

/// Definition of a single parameter
///
/// Missing fields take the same defaults as [`Parameter::builder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub init: f64,

    #[serde(default = "default_minval")]
    pub minval: f64,

    #[serde(default = "default_maxval")]
    pub maxval: f64,

    #[serde(default = "default_sigma")]
    pub sigma: f64,

    #[serde(default)]
    pub fix: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,

    #[serde(default)]
    pub kind: ParameterKind,
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            init: 0.0,
            minval: default_minval(),
            maxval: default_maxval(),
            sigma: default_sigma(),
            fix: false,
            center: None,
            beta: None,
            kind: ParameterKind::default(),
        }
    }
}

impl ParameterConfig {
    /// Validate the definition and build the parameter
    pub fn build(&self) -> Result<Parameter> {
        let param = Parameter::builder(&self.name)
            .init(self.init)
            .bounds(self.minval, self.maxval)
            .sigma(self.sigma)
            .fixed(self.fix)
            .optional_restraint(self.center, self.beta)
            .kind(self.kind)
            .build()?;
        Ok(param)
    }
}

impl Parameter {
    /// The configuration that rebuilds an equivalent parameter
    pub fn to_config(&self) -> ParameterConfig {
        ParameterConfig::from(self)
    }
}

impl From<&Parameter> for ParameterConfig {
    fn from(param: &Parameter) -> Self {
        Self {
            name: param.name().to_string(),
            init: param.init(),
            minval: param.minval(),
            maxval: param.maxval(),
            sigma: param.sigma(),
            fix: param.is_fixed(),
            center: param.center(),
            beta: param.beta(),
            kind: param.kind(),
        }
    }
}

/// The ordered parameter definitions of one refinement run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefinementConfig {
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

impl RefinementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the definitions of every parameter in a registry, in `xpos` order
    pub fn from_registry(registry: &ParameterRegistry) -> Self {
        Self {
            parameters: registry.iter().map(ParameterConfig::from).collect(),
        }
    }

    /// Build a registry; parameters receive positions in list order
    ///
    /// # Examples
    ///
    /// ```
    /// use reparam_rs::config::RefinementConfig;
    ///
    /// let json = r#"{
    ///   "parameters": [
    ///     { "name": "a_len", "init": 79.1, "minval": 78.0, "maxval": 80.0, "sigma": 0.1 },
    ///     { "name": "scale", "init": 1.0, "kind": "passthrough", "center": 1.0, "beta": 0.05 }
    ///   ]
    /// }"#;
    ///
    /// let registry = RefinementConfig::from_json(json).unwrap().build_registry().unwrap();
    /// assert_eq!(registry.len(), 2);
    /// assert_eq!(registry.xpos("scale"), Some(1));
    /// ```
    pub fn build_registry(&self) -> Result<ParameterRegistry> {
        let mut registry = ParameterRegistry::new();
        for config in &self.parameters {
            registry.add(config.build()?)?;
        }
        debug!(
            parameters = registry.len(),
            free = registry.free().count(),
            "built parameter registry"
        );
        Ok(registry)
    }

    /// Save the configuration to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Serialize the configuration to a JSON string
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load the configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load the configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RefinementConfig = serde_json::from_str(json)?;
        Ok(config)
    }
}
