use std::time::Instant;

use crate::simulation::forces::{DirectSummation, ForceModel, TreeGravity};
use crate::simulation::params::SOFTENING;
use crate::simulation::quadtree::DEFAULT_MAX_DEPTH;
use crate::simulation::states::{Body, NVec3};

/// Time one force evaluation, direct vs tree, for each system size in `ns`
pub fn bench_forces(ns: &[usize]) {
    let direct = DirectSummation { g: 1.0, eps2: SOFTENING };
    let tree = TreeGravity {
        g: 1.0,
        eps2: SOFTENING,
        theta: 0.5,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    for &n in ns {
        let bodies = make_bodies(n);
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        direct.accumulate(&bodies, &mut out);
        tree.accumulate(&bodies, &mut out);

        // Time direct
        out.fill(NVec3::zeros());
        let t0 = Instant::now();
        direct.accumulate(&bodies, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();
        let reference = out.clone();

        // Time tree
        out.fill(NVec3::zeros());
        let t1 = Instant::now();
        tree.accumulate(&bodies, &mut out);
        let dt_tree = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, {} = {:8.6} s, {} = {:8.6} s, max rel err = {:.3e}",
            direct.name(),
            dt_direct,
            tree.name(),
            dt_tree,
            max_relative_error(&reference, &out)
        );
    }
}

/// Deterministic bodies spread over the unit square, no rand needed
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                0.5 + 0.45 * (i_f * 0.37).sin(),
                0.5 + 0.45 * (i_f * 0.13).cos(),
                0.5 + 0.45 * (i_f * 0.07).sin(),
            );
            Body::new(1.0 / n as f64, x, NVec3::zeros())
        })
        .collect()
}

fn max_relative_error(reference: &[NVec3], approx: &[NVec3]) -> f64 {
    reference
        .iter()
        .zip(approx)
        .filter(|(r, _)| r.norm() > 0.0)
        .map(|(r, a)| (r - a).norm() / r.norm())
        .fold(0.0, f64::max)
}
