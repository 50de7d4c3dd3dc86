//! # Quadtree over the X-Y plane
//!
//! Recursive spatial partition that indexes bodies by their X-Y projection.
//! The Z coordinate is ignored for placement.
//!
//! - A square region ([`Quad`]) is split into four equal quadrants
//!   (NW, NE, SW, SE) whenever a second body lands in an occupied leaf.
//! - Leaves hold at most one body, except at `max_depth` where subdivision
//!   stops and the leaf keeps every body that reaches it. This bounds the
//!   recursion for bodies sharing the same (x, y).
//! - Internal nodes always have exactly four children and no occupant.
//! - A body inside a node's region always ends up somewhere below it, even
//!   when rounding puts it outside all four quadrants.
//!
//! Nodes live in a flat arena (`Vec<QuadNode>`) and refer to each other by
//! index. Occupants are indices into the caller's body slice, so a tree is
//! only meaningful next to the collection it was built from.
//!
//! Each node can also carry aggregate mass and center of mass
//! ([`QuadTree::compute_mass_and_com`]), which [`QuadTree::force_on_body`]
//! uses for a Barnes-Hut style traversal.

use crate::simulation::states::{Body, NVec3};

/// Recursion bound for coincident or near-coincident bodies
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Largest accepted `max_depth`. Deeper quadrants fall below f64 resolution
/// for coordinates of order one.
pub const MAX_DEPTH_LIMIT: u32 = 48;

/// Smallest half-size [`Quad::enclosing`] will produce
const MIN_HALF_SIZE: f64 = 1e-9;

/// Relative margin [`Quad::enclosing`] adds around the extreme bodies
const ENCLOSING_PAD: f64 = 1e-12;

/// Child slots, in the order children are tested during insertion
pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;

/// Axis-aligned square `[cx - half, cx + half] x [cy - half, cy + half]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub cx: f64,
    pub cy: f64,
    pub half: f64,
}

impl Quad {
    pub fn new(cx: f64, cy: f64, half: f64) -> Self {
        debug_assert!(half > 0.0, "quad half-size must be positive");
        Self { cx, cy, half }
    }

    /// Unit square centered on (0.5, 0.5)
    pub fn unit() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }

    /// Boundary-inclusive containment on X and Y
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.cx - self.half
            && x <= self.cx + self.half
            && y >= self.cy - self.half
            && y <= self.cy + self.half
    }

    pub fn contains_body(&self, b: &Body) -> bool {
        self.contains(b.x.x, b.x.y)
    }

    /// Side length of the square
    pub fn size(&self) -> f64 {
        2.0 * self.half
    }

    /// One of the four quadrants, indexed by `NW`, `NE`, `SW`, `SE`
    pub fn quadrant(&self, slot: usize) -> Self {
        let h = self.half / 2.0;
        match slot {
            NW => Self::new(self.cx - h, self.cy + h, h),
            NE => Self::new(self.cx + h, self.cy + h, h),
            SW => Self::new(self.cx - h, self.cy - h, h),
            _ => Self::new(self.cx + h, self.cy - h, h),
        }
    }

    /// Smallest square enclosing the X-Y projection of every body.
    ///
    /// Falls back to the unit square when `bodies` is empty.
    pub fn enclosing(bodies: &[Body]) -> Self {
        if bodies.is_empty() {
            return Self::unit();
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for b in bodies {
            min_x = min_x.min(b.x.x);
            min_y = min_y.min(b.x.y);
            max_x = max_x.max(b.x.x);
            max_y = max_y.max(b.x.y);
        }

        // padded so that rounding in `center +- half` cannot exclude an extreme body
        let extent = (0.5 * (max_x - min_x)).max(0.5 * (max_y - min_y));
        let scale = min_x.abs().max(max_x.abs()).max(min_y.abs()).max(max_y.abs());
        let half = extent + (extent + scale) * ENCLOSING_PAD + MIN_HALF_SIZE;
        Self::new(0.5 * (min_x + max_x), 0.5 * (min_y + max_y), half)
    }
}

/// A single node of the arena.
#[derive(Debug, Clone)]
pub struct QuadNode {
    pub region: Quad,
    pub depth: u32,
    pub occupants: Vec<usize>,         // body indices, empty on internal nodes
    pub children: Option<[usize; 4]>,  // NW, NE, SW, SE
    pub mass: f64,                     // subtree mass, see compute_mass_and_com
    pub com: NVec3,                    // subtree center of mass
}

impl QuadNode {
    fn new(region: Quad, depth: u32) -> Self {
        Self {
            region,
            depth,
            occupants: Vec::new(),
            children: None,
            mass: 0.0,
            com: NVec3::zeros(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Write-once quadtree: bodies are appended, never removed or moved.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    root: usize,
    max_depth: u32,
}

impl QuadTree {
    /// Empty tree covering `region`. `max_depth` is capped at [`MAX_DEPTH_LIMIT`].
    pub fn new(region: Quad, max_depth: u32) -> Self {
        Self {
            nodes: vec![QuadNode::new(region, 0)],
            root: 0,
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
        }
    }

    /// Insert every body of `bodies` in order.
    ///
    /// Bodies outside `region` are left out of the tree and reported with a
    /// warning; the returned tree covers the rest.
    pub fn build(region: Quad, max_depth: u32, bodies: &[Body]) -> Self {
        let mut tree = Self::new(region, max_depth);
        for i in 0..bodies.len() {
            if !tree.insert(i, bodies) {
                log::warn!(
                    "body {} at ({:.6}, {:.6}) lies outside the root region, not indexed",
                    i + 1,
                    bodies[i].x.x,
                    bodies[i].x.y
                );
            }
        }
        tree
    }

    /// Insert `bodies[body_idx]`. Returns `false` if the root region does not
    /// contain it.
    pub fn insert(&mut self, body_idx: usize, bodies: &[Body]) -> bool {
        self.insert_at(self.root, body_idx, bodies)
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[self.root]
    }

    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &QuadNode {
        &self.nodes[idx]
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn occupied_leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf() && !n.occupants.is_empty()).count()
    }

    /// Number of bodies held anywhere in the tree
    pub fn body_count(&self) -> usize {
        self.nodes.iter().map(|n| n.occupants.len()).sum()
    }

    /// Deepest level any node reached
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Leaf reached by following the insertion rule for `(x, y)`
    pub fn leaf_for(&self, x: f64, y: f64) -> Option<&QuadNode> {
        let mut node = &self.nodes[self.root];
        if !node.region.contains(x, y) {
            return None;
        }
        while let Some(children) = node.children {
            node = children
                .iter()
                .map(|&c| &self.nodes[c])
                .find(|c| c.region.contains(x, y))?;
        }
        Some(node)
    }

    // helpers ==============================================================================

    fn insert_at(&mut self, node_idx: usize, body_idx: usize, bodies: &[Body]) -> bool {
        let pos = bodies[body_idx].x;
        if !self.nodes[node_idx].region.contains(pos.x, pos.y) {
            return false;
        }
        self.place(node_idx, body_idx, bodies)
    }

    /// Insert below `node_idx`, whose region is taken to hold the body
    fn place(&mut self, node_idx: usize, body_idx: usize, bodies: &[Body]) -> bool {
        let node = &self.nodes[node_idx];

        if node.is_leaf() {
            // empty leaf, or a leaf that may no longer split
            if node.occupants.is_empty() || node.depth >= self.max_depth {
                self.nodes[node_idx].occupants.push(body_idx);
                return true;
            }

            // occupied leaf: split and push the resident down
            let resident = std::mem::take(&mut self.nodes[node_idx].occupants);
            self.subdivide(node_idx);
            for r in resident {
                self.insert_into_children(node_idx, r, bodies);
            }
        }

        self.insert_into_children(node_idx, body_idx, bodies)
    }

    /// First child (NW, NE, SW, SE) whose region contains the body wins.
    ///
    /// The parent already contains the body, so when rounding leaves it in
    /// none of the four children it goes to the quadrant on its side of the
    /// parent center instead of being dropped.
    fn insert_into_children(&mut self, node_idx: usize, body_idx: usize, bodies: &[Body]) -> bool {
        let Some(children) = self.nodes[node_idx].children else {
            return false;
        };
        let pos = bodies[body_idx].x;
        for child in children {
            if self.nodes[child].region.contains(pos.x, pos.y) {
                return self.insert_at(child, body_idx, bodies);
            }
        }

        let region = self.nodes[node_idx].region;
        let slot = match (pos.y >= region.cy, pos.x < region.cx) {
            (true, true) => NW,
            (true, false) => NE,
            (false, true) => SW,
            (false, false) => SE,
        };
        log::debug!("body {body_idx} fell between quadrants at depth {}", self.nodes[node_idx].depth);
        self.place(children[slot], body_idx, bodies)
    }

    fn subdivide(&mut self, node_idx: usize) {
        let region = self.nodes[node_idx].region;
        let depth = self.nodes[node_idx].depth + 1;

        let mut children = [0usize; 4];
        for (slot, child) in children.iter_mut().enumerate() {
            *child = self.nodes.len();
            self.nodes.push(QuadNode::new(region.quadrant(slot), depth));
        }
        self.nodes[node_idx].children = Some(children);
    }

    // aggregation / approximate forces =====================================================

    /// Bottom-up pass filling every node's `mass` and `com`.
    ///
    /// `bodies` must be the slice the tree was built from.
    pub fn compute_mass_and_com(&mut self, bodies: &[Body]) {
        self.aggregate(self.root, bodies);
    }

    fn aggregate(&mut self, node_idx: usize, bodies: &[Body]) {
        let mut mass = 0.0;
        let mut com = NVec3::zeros();

        for &bidx in &self.nodes[node_idx].occupants {
            let b = &bodies[bidx];
            mass += b.mass();
            com += b.x * b.mass();
        }

        if let Some(children) = self.nodes[node_idx].children {
            for child in children {
                self.aggregate(child, bodies);
                let cn = &self.nodes[child];
                if cn.mass > 0.0 {
                    mass += cn.mass;
                    com += cn.com * cn.mass;
                }
            }
        }

        if mass > 0.0 {
            com /= mass;
        }

        let node = &mut self.nodes[node_idx];
        node.mass = mass;
        node.com = com;
    }

    /// Net force on `bodies[i]` using the aggregated tree.
    ///
    /// Internal nodes with `size / distance < theta` are treated as a single
    /// mass at their center of mass, unless their region contains
    /// `bodies[i]`. Everything else is opened down to the leaves, where
    /// occupants interact exactly. `theta == 0` never
    /// aggregates. Requires [`QuadTree::compute_mass_and_com`] first.
    pub fn force_on_body(&self, i: usize, bodies: &[Body], g: f64, eps2: f64, theta: f64) -> NVec3 {
        let mut f = NVec3::zeros();
        self.traverse(self.root, i, bodies, g, eps2, theta, &mut f);
        f
    }

    #[allow(clippy::too_many_arguments)]
    fn traverse(&self, node_idx: usize, i: usize, bodies: &[Body], g: f64, eps2: f64, theta: f64, f: &mut NVec3) {
        let node = &self.nodes[node_idx];
        if node.mass == 0.0 {
            return;
        }

        let bi = &bodies[i];

        let Some(children) = node.children else {
            for &j in &node.occupants {
                if j != i {
                    *f += bi.compute_force_from(&bodies[j], g, eps2);
                }
            }
            return;
        };

        // a node holding body i itself is always opened, so i never pulls on itself
        let r = node.com - bi.x;
        let dist = r.norm();
        if theta > 0.0 && dist > 0.0 && !node.region.contains_body(bi) && node.region.size() / dist < theta {
            let d2 = r.dot(&r) + eps2;
            *f += r * (g * bi.mass() * node.mass / (d2 * d2.sqrt()));
        } else {
            for child in children {
                self.traverse(child, i, bodies, g, eps2, theta, f);
            }
        }
    }
}
