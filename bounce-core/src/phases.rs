//! Simulation phases of one step.
//!
//! A step runs, in order:
//! 1. [`rebuild_phase`] — clear the quadtree and insert every body.
//! 2. [`collision_phase`] — test and resolve pairs inside each leaf.
//! 3. [`integration_phase`] — reflect off the walls and move.
//!
//! [`step`] chains the three and returns a [`StepReport`].

use crate::{body::Body, collision, quadtree::QuadTree, types::BodyId};
use glam::Vec2;
use tracing::trace;

/// Counters and collision results of one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Bodies accepted by the index.
    pub indexed: usize,
    /// Bodies outside the root region; they skipped collision checks.
    pub dropped: usize,
    pub leaves: usize,
    pub pairs_tested: usize,
    /// Bodies that collided at least once, in first-hit order.
    pub collided: Vec<BodyId>,
}

/// Rebuilds the index from scratch, inserting bodies in collection order.
///
/// ### Returns
/// Number of bodies the index accepted.
pub fn rebuild_phase(tree: &mut QuadTree, bodies: &[Body]) -> usize {
    tree.clear();
    (0..bodies.len())
        .filter(|&id| tree.insert(bodies, id))
        .count()
}

/// Resolves collisions leaf by leaf.
///
/// Only bodies sharing a leaf are tested against each other. Fills
/// `leaves`, `pairs_tested` and `collided` of `report`.
pub fn collision_phase(tree: &QuadTree, bodies: &mut [Body], report: &mut StepReport) {
    let mut hits = Vec::new();
    let mut leaves = 0;
    let mut tested = 0;

    for leaf in tree.leaves() {
        leaves += 1;
        tested += collision::collide_group(leaf.bodies(), bodies, &mut hits);
    }

    report.leaves = leaves;
    report.pairs_tested = tested;
    report.collided = first_hits(hits, bodies.len());
}

/// Parallel variant of [`collision_phase`] with identical results.
///
/// Leaves partition the bodies, so each leaf works on its own copy of
/// its bodies and the copies are written back afterwards.
#[cfg(feature = "parallel")]
pub fn par_collision_phase(tree: &QuadTree, bodies: &mut [Body], report: &mut StepReport) {
    use rayon::prelude::*;

    let leaves: Vec<&[BodyId]> = tree.leaves().map(QuadTree::bodies).collect();

    let outcomes: Vec<(Vec<Body>, Vec<BodyId>, usize)> = {
        let snapshot: &[Body] = bodies;
        leaves
            .par_iter()
            .map(|ids| {
                let mut local: Vec<Body> = ids
                    .iter()
                    .filter_map(|&id| snapshot.get(id).cloned())
                    .collect();
                let local_ids: Vec<BodyId> = (0..local.len()).collect();
                let mut local_hits = Vec::new();
                let tested = collision::collide_group(&local_ids, &mut local, &mut local_hits);
                let hits = local_hits.into_iter().map(|n| ids[n]).collect();
                (local, hits, tested)
            })
            .collect()
    };

    let mut hits = Vec::new();
    let mut tested = 0;
    for (ids, (local, leaf_hits, leaf_tested)) in leaves.iter().zip(outcomes) {
        for (&id, body) in ids.iter().zip(local) {
            bodies[id] = body;
        }
        hits.extend(leaf_hits);
        tested += leaf_tested;
    }

    report.leaves = leaves.len();
    report.pairs_tested = tested;
    report.collided = first_hits(hits, bodies.len());
}

/// Drops repeated ids, keeping the first occurrence of each.
fn first_hits(hits: Vec<BodyId>, len: usize) -> Vec<BodyId> {
    let mut seen = vec![false; len];
    hits.into_iter()
        .filter(|&id| !std::mem::replace(&mut seen[id], true))
        .collect()
}

/// Bounces a body off the walls of a `dims.x` by `dims.y` area.
///
/// Per axis: at or below `radius / 2` the velocity flips and the body
/// is clamped to `radius / 2`; at or beyond `dim - radius / 2` the same
/// happens on the far side.
pub fn reflect_off_walls(body: &mut Body, dims: Vec2) {
    let clearance = body.radius * 0.5;
    for axis in 0..2 {
        if body.pos[axis] <= clearance {
            body.vel[axis] = -body.vel[axis];
            body.pos[axis] = clearance;
        }
        if body.pos[axis] + clearance >= dims[axis] {
            body.vel[axis] = -body.vel[axis];
            body.pos[axis] = dims[axis] - clearance;
        }
    }
}

/// Reflects every body off the walls, then advances it by its velocity.
pub fn integration_phase(bodies: &mut [Body], dims: Vec2) {
    for body in bodies.iter_mut() {
        reflect_off_walls(body, dims);
        body.pos += body.vel;
    }
}

/// Advances the bodies by one step.
///
/// The quadtree's current region bounds the index; `dims` bounds the
/// walls. Flags set by collisions are left for the caller to clear.
pub fn step(tree: &mut QuadTree, bodies: &mut [Body], dims: Vec2) -> StepReport {
    let indexed = rebuild_phase(tree, bodies);
    let mut report = StepReport {
        indexed,
        dropped: bodies.len() - indexed,
        ..StepReport::default()
    };

    #[cfg(feature = "parallel")]
    par_collision_phase(tree, bodies, &mut report);
    #[cfg(not(feature = "parallel"))]
    collision_phase(tree, bodies, &mut report);

    integration_phase(bodies, dims);

    trace!(
        indexed = report.indexed,
        dropped = report.dropped,
        leaves = report.leaves,
        pairs = report.pairs_tested,
        collided = report.collided.len(),
        "step"
    );
    report
}
