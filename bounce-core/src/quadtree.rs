//! Region quadtree used to cull collision checks.
//!
//! The tree is rebuilt from empty every step: [`QuadTree::clear`], then
//! [`QuadTree::insert`] for every body. It stores only [`BodyId`]s, so
//! the body collection stays owned by the caller.

use crate::{body::Body, config::Config, region::Region, types::BodyId};

/// A node of the spatial index. The root is an ordinary node at depth 0.
///
/// A node is either a leaf holding body ids directly, or subdivided,
/// owning exactly four children (NE, NW, SE, SW) and no ids.
#[derive(Debug)]
pub struct QuadTree {
    region: Region,
    capacity: usize,
    max_divisions: u32,
    depth: u32,
    bodies: Vec<BodyId>,
    children: Option<Box<[QuadTree; 4]>>,
}

impl QuadTree {
    /// Creates an empty root node covering `region`.
    ///
    /// Capacity and the depth ceiling come from `cfg` and are inherited
    /// by every node created by subdivision.
    pub fn new(region: Region, cfg: &Config) -> Self {
        Self::node(region, cfg.capacity, cfg.max_divisions, 0)
    }

    fn node(region: Region, capacity: usize, max_divisions: u32, depth: u32) -> Self {
        Self {
            region,
            capacity,
            max_divisions,
            depth,
            bodies: Vec::with_capacity(capacity),
            children: None,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Body ids held directly by this node. Always empty once subdivided.
    pub fn bodies(&self) -> &[BodyId] {
        &self.bodies
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Children in NE, NW, SE, SW order, if subdivided.
    pub fn children(&self) -> Option<&[QuadTree; 4]> {
        self.children.as_deref()
    }

    /// Number of body ids stored anywhere below this node.
    pub fn len(&self) -> usize {
        self.leaves().map(|leaf| leaf.bodies.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces this node's region.
    ///
    /// Existing children keep their old regions until the next
    /// [`QuadTree::clear`], which every step performs.
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Drops every child and stored id, leaving an empty leaf.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.children = None;
    }

    /// Inserts the body `id` (an index into `bodies`).
    ///
    /// 1. Rejects the body if its anchor (see [`Body::is_inside`]) lies
    ///    outside this node's region, or `id` is out of range.
    /// 2. Past the depth ceiling, the body is stored here regardless of
    ///    how many ids the node already holds.
    /// 3. A leaf with room stores the body.
    /// 4. Otherwise the node subdivides (once) and the children are
    ///    tried in NE, NW, SE, SW order; the first to accept wins.
    ///
    /// ### Returns
    /// `true` if some node stored the id, `false` if it was dropped.
    pub fn insert(&mut self, bodies: &[Body], id: BodyId) -> bool {
        let Some(body) = bodies.get(id) else {
            return false;
        };
        if !body.is_inside(&self.region) {
            return false;
        }

        if self.depth > self.max_divisions {
            self.bodies.push(id);
            return true;
        }

        if self.children.is_none() {
            if self.bodies.len() < self.capacity {
                self.bodies.push(id);
                return true;
            }
            self.subdivide(bodies);
        }

        self.children
            .as_mut()
            .is_some_and(|children| children.iter_mut().any(|c| c.insert(bodies, id)))
    }

    /// Splits into four children and pushes the held ids down into them.
    fn subdivide(&mut self, bodies: &[Body]) {
        let depth = self.depth + 1;
        let (capacity, max_divisions) = (self.capacity, self.max_divisions);
        let children = self
            .region
            .quadrants()
            .map(|region| QuadTree::node(region, capacity, max_divisions, depth));
        self.children = Some(Box::new(children));

        let held = std::mem::take(&mut self.bodies);
        for id in held {
            self.insert(bodies, id);
        }
    }

    /// Depth-first walk over every node, children in NE, NW, SE, SW order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Every unsubdivided node, in the same order as [`QuadTree::nodes`].
    ///
    /// Each call starts a fresh traversal.
    pub fn leaves(&self) -> impl Iterator<Item = &QuadTree> + '_ {
        self.nodes().filter(|n| !n.is_subdivided())
    }
}

/// Iterator returned by [`QuadTree::nodes`].
#[derive(Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a QuadTree>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a QuadTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = &node.children {
            // Reversed so NE is visited first.
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
