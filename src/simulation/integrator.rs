//! Fixed-step explicit Euler integrator
//!
//! One force evaluation per step, driven by a `ForceSet` and `Parameters`.

use super::forces::ForceSet;
use super::params::Parameters;
use super::states::{NVec3, System};

/// Advance the system by one step.
///
/// Forces are computed for every body from the pre-step state before any
/// body moves. Then each body gets `update_velocity` followed by
/// `update_position`. `scratch` is resized to the body count as needed.
pub fn euler_step(sys: &mut System, forces: &ForceSet, params: &Parameters, scratch: &mut Vec<NVec3>) {
    let n = sys.bodies.len();
    let dt = params.dt;

    scratch.resize(n, NVec3::zeros());
    forces.accumulate_forces(&sys.bodies, scratch);

    for (b, f) in sys.bodies.iter_mut().zip(scratch.iter()) {
        b.update_velocity(f, dt);
        b.update_position(dt);
    }

    sys.t += dt;
    sys.step += 1;
}
