//! Engine configuration loaded from YAML.
//!
//! The file itself is optional, and any field it leaves out falls back to
//! the compiled-in defaults (direct summation, `dt = 0.01`, unit square root
//! region).
//!
//! # YAML format
//!
//! ```yaml
//! force: "tree"        # or "direct"
//! theta: 0.5           # opening threshold for "tree"
//! max_depth: 32        # quadtree subdivision bound, at most 48
//! dt: 0.01             # step size
//! softening: 1.0e-10   # added to |r|^2
//! root:
//!   center_x: 0.5
//!   center_y: 0.5
//!   half_size: 0.5
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::params::{DEFAULT_DT, SOFTENING};
use crate::simulation::quadtree::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Which force evaluation the step loop uses
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceConfig {
    #[serde(rename = "direct")] // exact pairwise summation
    #[default]
    Direct,

    #[serde(rename = "tree")] // quadtree aggregation controlled by theta
    Tree,
}

/// Square the simulation tree is built over
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RootConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub half_size: f64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            center_x: 0.5,
            center_y: 0.5,
            half_size: 0.5,
        }
    }
}

/// Engine-level settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub force: ForceConfig, // force evaluation strategy
    pub theta: f64,         // opening threshold, only used by `tree`
    pub max_depth: u32,     // subdivision bound for coincident bodies
    pub dt: f64,            // step size
    pub softening: f64,     // eps added to squared separations
    pub root: RootConfig,   // fixed root region of the simulation tree
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            force: ForceConfig::Direct,
            theta: 0.5,
            max_depth: DEFAULT_MAX_DEPTH,
            dt: DEFAULT_DT,
            softening: SOFTENING,
            root: RootConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: EngineConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.root.half_size > 0.0 && self.root.half_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "root.half_size must be positive, got {}",
                self.root.half_size
            )));
        }
        if !(self.theta >= 0.0) {
            return Err(ConfigError::Invalid(format!("theta must be non-negative, got {}", self.theta)));
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be in 1..={MAX_DEPTH_LIMIT}, got {}",
                self.max_depth
            )));
        }
        if !(self.softening >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "softening must be non-negative, got {}",
                self.softening
            )));
        }
        Ok(())
    }
}
