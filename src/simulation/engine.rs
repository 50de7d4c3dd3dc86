//! High-level runtime engine settings
//!
//! Selects the force strategy, the fixed root region of the simulation tree
//! and the subdivision bound used when building and running a `Scenario`

use crate::configuration::config::{EngineConfig, ForceConfig};
use crate::simulation::forces::{DirectSummation, ForceSet, TreeGravity};
use crate::simulation::params::Parameters;
use crate::simulation::quadtree::{Quad, DEFAULT_MAX_DEPTH};

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub force: ForceConfig, // direct or tree
    pub theta: f64,         // opening threshold for tree gravity
    pub max_depth: u32,     // quadtree subdivision bound
    pub root: Quad,         // region the simulation tree covers
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            force: ForceConfig::Direct,
            theta: 0.5,
            max_depth: DEFAULT_MAX_DEPTH,
            root: Quad::unit(),
        }
    }
}

impl Engine {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            force: cfg.force,
            theta: cfg.theta,
            max_depth: cfg.max_depth,
            root: Quad::new(cfg.root.center_x, cfg.root.center_y, cfg.root.half_size),
        }
    }

    /// Force set matching the selected strategy
    pub fn force_set(&self, params: &Parameters) -> ForceSet {
        match self.force {
            ForceConfig::Direct => ForceSet::new().with(DirectSummation {
                g: params.g,
                eps2: params.eps2,
            }),
            ForceConfig::Tree => ForceSet::new().with(TreeGravity {
                g: params.g,
                eps2: params.eps2,
                theta: self.theta,
                max_depth: self.max_depth,
            }),
        }
    }
}
