//! Build a ready-to-run simulation from configuration
//!
//! Takes the parsed input (`ScenarioConfig`) and the engine settings
//! (`EngineConfig`) and produces a `Scenario` bundling:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - initial bodies at t = 0

use crate::configuration::config::EngineConfig;
use crate::configuration::input::{BodyConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::simulator::{SimError, Simulator};
use crate::simulation::states::{Body, NVec3};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub bodies: Vec<Body>,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig, engine_cfg: &EngineConfig) -> Self {
        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies: Vec<Body> = cfg
            .bodies
            .iter()
            .map(|bc: &BodyConfig| {
                Body::new(
                    bc.m,
                    NVec3::new(bc.x[0], bc.x[1], bc.x[2]),
                    NVec3::new(bc.v[0], bc.v[1], bc.v[2]),
                )
            })
            .collect();

        let parameters = Parameters {
            g: cfg.g,
            dt: engine_cfg.dt,
            eps2: engine_cfg.softening,
            time_steps: cfg.time_steps,
        };

        Self {
            engine: Engine::from_config(engine_cfg),
            parameters,
            bodies,
        }
    }

    /// Simulator with the bodies loaded, ready for `build_tree`
    pub fn into_simulator(self) -> Result<Simulator, SimError> {
        let mut sim = Simulator::new(self.parameters, self.engine);
        sim.load_bodies(self.bodies)?;
        Ok(sim)
    }
}
