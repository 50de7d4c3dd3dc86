//! Numerical and physical parameters for a run
//!
//! `Parameters` holds the values the step loop needs:
//! - gravitational constant `g` (from the input file)
//! - fixed step size `dt` and step count
//! - softening `eps2` added to squared separations

/// Fixed integration step, unless an engine config overrides it
pub const DEFAULT_DT: f64 = 0.01;

/// Softening added to |r|^2 so coincident bodies stay finite
pub const SOFTENING: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub g: f64,            // gravitational constant
    pub dt: f64,           // step size
    pub eps2: f64,         // softening
    pub time_steps: usize, // number of steps in the run
}

impl Parameters {
    pub fn new(g: f64, time_steps: usize) -> Self {
        Self {
            g,
            dt: DEFAULT_DT,
            eps2: SOFTENING,
            time_steps,
        }
    }
}
