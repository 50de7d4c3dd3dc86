//! Force contributors for the step loop
//!
//! Defines the [`ForceModel`] strategy trait, exact direct summation, and a
//! quadtree-approximated variant that can be swapped in through the engine
//! config.

use crate::simulation::quadtree::{Quad, QuadTree};
use crate::simulation::states::{Body, NVec3};

/// Collection of force terms.
/// Each term implements [`ForceModel`] and their contributions are summed
/// into a single force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceModel + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceModel + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Short names of the terms, in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    /// Compute total forces for all bodies.
    /// `out[i]` is overwritten with the sum of every term's contribution
    pub fn accumulate_forces(&self, bodies: &[Body], out: &mut [NVec3]) {
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        for term in &self.terms {
            term.accumulate(bodies, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// A force source. Implementations add their contribution into `out[i]`
/// for each body and must only read `bodies`.
pub trait ForceModel {
    fn accumulate(&self, bodies: &[Body], out: &mut [NVec3]);

    fn name(&self) -> &'static str;
}

/// Exact O(n^2) Newtonian gravity with softening
pub struct DirectSummation {
    pub g: f64,    // gravitational constant
    pub eps2: f64, // softening
}

impl ForceModel for DirectSummation {
    fn accumulate(&self, bodies: &[Body], out: &mut [NVec3]) {
        for (i, bi) in bodies.iter().enumerate() {
            for (j, bj) in bodies.iter().enumerate() {
                if i != j {
                    out[i] += bi.compute_force_from(bj, self.g, self.eps2);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Newtonian gravity evaluated through a quadtree.
/// A fresh tree is built over the padded bounding square of the current
/// positions on every call, so no body is ever left out.
pub struct TreeGravity {
    pub g: f64,
    pub eps2: f64,
    pub theta: f64,     // opening threshold, 0 = exact
    pub max_depth: u32,
}

impl ForceModel for TreeGravity {
    fn accumulate(&self, bodies: &[Body], out: &mut [NVec3]) {
        if bodies.is_empty() {
            return;
        }
        let mut tree = QuadTree::build(Quad::enclosing(bodies), self.max_depth, bodies);
        tree.compute_mass_and_com(bodies);
        for (i, f) in out.iter_mut().enumerate().take(bodies.len()) {
            *f += tree.force_on_body(i, bodies, self.g, self.eps2, self.theta);
        }
    }

    fn name(&self) -> &'static str {
        "tree"
    }
}
