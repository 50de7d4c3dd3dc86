//! Core state types for the N-body simulation.
//!
//! - `Body`   point mass with position, velocity and (immutable) mass
//! - `System` the owned, ordered body collection plus elapsed time
//!
//! Bodies live in 3D; the spatial partition only looks at their X-Y projection.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    m: f64,       // mass, fixed at creation
}

impl Body {
    pub fn new(m: f64, x: NVec3, v: NVec3) -> Self {
        Self { x, v, m }
    }

    /// Body at rest at `(x, y, z)`
    pub fn at_rest(m: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(m, NVec3::new(x, y, z), NVec3::zeros())
    }

    pub fn mass(&self) -> f64 {
        self.m
    }

    /// Gravitational force exerted by `other` on this body.
    ///
    /// Magnitude is `g * m_self * m_other / (|r|^2 + eps2)`, direction is along
    /// `r = other.x - self.x`. The unit vector is taken against the softened
    /// distance, so two coincident bodies produce a zero vector.
    pub fn compute_force_from(&self, other: &Body, g: f64, eps2: f64) -> NVec3 {
        let r = other.x - self.x;
        let d2 = r.dot(&r) + eps2;
        let force = g * self.m * other.m / d2;
        r * (force / d2.sqrt())
    }

    /// Kick: v += (f / m) * dt
    pub fn update_velocity(&mut self, f: &NVec3, dt: f64) {
        let a = f / self.m;
        self.v += a * dt;
    }

    /// Drift: x += v * dt (first order)
    pub fn update_position(&mut self, dt: f64) {
        self.x += self.v * dt;
    }

    pub fn momentum(&self) -> NVec3 {
        self.v * self.m
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // owned collection, indices are stable for the run
    pub t: f64,            // elapsed time
    pub step: usize,       // completed steps
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0, step: 0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies.iter().fold(NVec3::zeros(), |p, b| p + b.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Softened pairwise potential energy, each pair counted once
    pub fn potential_energy(&self, g: f64, eps2: f64) -> f64 {
        let mut u = 0.0;
        for (i, bi) in self.bodies.iter().enumerate() {
            for bj in &self.bodies[i + 1..] {
                let r = bj.x - bi.x;
                u -= g * bi.m * bj.m / (r.dot(&r) + eps2).sqrt();
            }
        }
        u
    }

    /// Mass-weighted mean position, `None` for an empty or massless system
    pub fn center_of_mass(&self) -> Option<NVec3> {
        let m = self.total_mass();
        if m <= 0.0 {
            return None;
        }
        let weighted = self.bodies.iter().fold(NVec3::zeros(), |acc, b| acc + b.x * b.m);
        Some(weighted / m)
    }
}
