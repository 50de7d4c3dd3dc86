//! Run driver.
//!
//! The simulator owns the body collection for the whole run and moves
//! through a fixed sequence of phases:
//!
//! `Uninitialized -> BodiesLoaded -> TreeBuilt -> Stepping(k) -> Done`
//!
//! The quadtree is built once over the configured root region and is kept
//! next to the bodies it indexes. It is not rebuilt as bodies move, and the
//! default force model does not read it.

use std::fmt;

use thiserror::Error;

use crate::report::Reporter;
use crate::simulation::engine::Engine;
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::quadtree::QuadTree;
use crate::simulation::states::{Body, NVec3, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    BodiesLoaded,
    TreeBuilt,
    Stepping(usize), // steps completed so far
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uninitialized => write!(f, "uninitialized"),
            Phase::BodiesLoaded => write!(f, "bodies loaded"),
            Phase::TreeBuilt => write!(f, "tree built"),
            Phase::Stepping(k) => write!(f, "stepping ({k} done)"),
            Phase::Done => write!(f, "done"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: &'static str },
    #[error("body {body} has non-positive mass {mass}")]
    NonPositiveMass { body: usize, mass: f64 },
    #[error("body {body} has a non-finite position or velocity")]
    NonFiniteState { body: usize },
    #[error("failed to report state: {0}")]
    Report(#[from] std::io::Error),
}

pub struct Simulator {
    params: Parameters,
    engine: Engine,
    forces: ForceSet,
    phase: Phase,
    system: System,
    tree: Option<QuadTree>,
    scratch: Vec<NVec3>,
}

impl Simulator {
    pub fn new(params: Parameters, engine: Engine) -> Self {
        let forces = engine.force_set(&params);
        Self::with_forces(params, engine, forces)
    }

    /// Simulator using a caller-supplied force set instead of the engine's
    pub fn with_forces(params: Parameters, engine: Engine, forces: ForceSet) -> Self {
        Self {
            params,
            engine,
            forces,
            phase: Phase::Uninitialized,
            system: System::default(),
            tree: None,
            scratch: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn tree(&self) -> Option<&QuadTree> {
        self.tree.as_ref()
    }

    /// Take ownership of the body collection. Masses must be positive.
    pub fn load_bodies(&mut self, bodies: Vec<Body>) -> Result<(), SimError> {
        self.expect_phase(Phase::Uninitialized, "load bodies")?;

        for (i, b) in bodies.iter().enumerate() {
            if !(b.mass() > 0.0) {
                return Err(SimError::NonPositiveMass { body: i + 1, mass: b.mass() });
            }
            if !(b.x.iter().all(|c| c.is_finite()) && b.v.iter().all(|c| c.is_finite())) {
                return Err(SimError::NonFiniteState { body: i + 1 });
            }
        }

        log::info!("loaded {} bodies, G = {}", bodies.len(), self.params.g);
        self.system = System::new(bodies);
        self.phase = Phase::BodiesLoaded;
        Ok(())
    }

    /// Index every body in a quadtree over the root region.
    /// Bodies outside the region stay in the simulation but not in the tree.
    pub fn build_tree(&mut self) -> Result<&QuadTree, SimError> {
        self.expect_phase(Phase::BodiesLoaded, "build the tree")?;

        let tree = QuadTree::build(self.engine.root, self.engine.max_depth, &self.system.bodies);
        log::info!(
            "built quadtree: {} nodes, {} leaves, depth {}, {}/{} bodies indexed",
            tree.node_count(),
            tree.leaf_count(),
            tree.depth(),
            tree.body_count(),
            self.system.len()
        );
        log::info!("force terms: {}", self.forces.names().join(", "));

        self.phase = Phase::TreeBuilt;
        let tree = self.tree.insert(tree);
        Ok(&*tree)
    }

    /// Advance one step. Returns the number of steps completed.
    pub fn step(&mut self) -> Result<usize, SimError> {
        let done = match self.phase {
            Phase::TreeBuilt if self.params.time_steps > 0 => 0,
            Phase::Stepping(k) => k,
            phase => return Err(SimError::InvalidTransition { phase, action: "step" }),
        };

        euler_step(&mut self.system, &self.forces, &self.params, &mut self.scratch);

        let done = done + 1;
        log::debug!("step {done}/{} t = {:.6}", self.params.time_steps, self.system.t);
        self.phase = if done >= self.params.time_steps { Phase::Done } else { Phase::Stepping(done) };
        Ok(done)
    }

    /// Build the tree if needed, then run every remaining step, reporting
    /// the initial state once and the post-step state after each step.
    pub fn run(&mut self, reporters: &mut [&mut dyn Reporter]) -> Result<(), SimError> {
        if self.phase == Phase::BodiesLoaded {
            self.build_tree()?;
        }
        self.expect_phase(Phase::TreeBuilt, "run")?;

        for r in reporters.iter_mut() {
            r.initial(&self.system)?;
        }

        for _ in 0..self.params.time_steps {
            let k = self.step()?;
            for r in reporters.iter_mut() {
                r.step(k, &self.system)?;
            }
        }
        self.phase = Phase::Done;

        for r in reporters.iter_mut() {
            r.finish()?;
        }

        let p = self.system.total_momentum();
        log::info!(
            "finished {} steps, t = {:.6}, momentum = ({:.6e}, {:.6e}, {:.6e}), energy = {:.6e}",
            self.system.step,
            self.system.t,
            p.x,
            p.y,
            p.z,
            self.system.kinetic_energy() + self.system.potential_energy(self.params.g, self.params.eps2)
        );
        Ok(())
    }

    fn expect_phase(&self, want: Phase, action: &'static str) -> Result<(), SimError> {
        if self.phase != want {
            return Err(SimError::InvalidTransition { phase: self.phase, action });
        }
        Ok(())
    }
}
