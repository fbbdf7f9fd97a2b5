use crate::{
    body::{self, Body},
    config::Config,
    error::SimResult,
    phases::{self, StepReport},
    quadtree::QuadTree,
    region::Region,
    types::BodyId,
};
use glam::Vec2;
use rand::Rng;
use std::ops::Range;
use tracing::debug;

/// Step driver: owns the bodies, the quadtree and the configuration.
///
/// The playing field spans `[0, dims.x] x [0, dims.y]` and doubles as
/// the quadtree's root region.
#[derive(Debug)]
pub struct Simulation {
    cfg: Config,
    dims: Vec2,
    tree: QuadTree,
    bodies: Vec<Body>,
}

impl Simulation {
    /// Creates an empty simulation for a `dims.x` by `dims.y` area.
    ///
    /// ### Returns
    /// - `Err(SimError::InvalidConfig)` if `cfg` fails [`Config::validate`].
    /// - `Err(SimError::InvalidRegion)` if `dims` is negative or non-finite.
    pub fn new(cfg: Config, dims: Vec2) -> SimResult<Self> {
        Self::with_bodies(cfg, dims, Vec::new())
    }

    /// Like [`Simulation::new`], starting from an existing body collection.
    pub fn with_bodies(cfg: Config, dims: Vec2, bodies: Vec<Body>) -> SimResult<Self> {
        cfg.validate()?;
        let region = Region::from_dims(dims)?;
        debug!(?dims, bodies = bodies.len(), ?cfg, "simulation created");

        Ok(Self {
            cfg,
            dims,
            tree: QuadTree::new(region, &cfg),
            bodies,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the configuration. Index settings apply from the next step.
    pub fn set_config(&mut self, cfg: Config) -> SimResult<()> {
        cfg.validate()?;
        self.tree = QuadTree::new(*self.tree.region(), &cfg);
        self.cfg = cfg;
        Ok(())
    }

    pub fn dims(&self) -> Vec2 {
        self.dims
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// The index as built by the last step.
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    /// Changes the playing field, effective from the next step.
    ///
    /// Bodies left outside the new area are not moved here; they are
    /// skipped by the index until wall reflection brings them back.
    pub fn resize(&mut self, dims: Vec2) -> SimResult<()> {
        let region = Region::from_dims(dims)?;
        if dims != self.dims {
            debug!(from = ?self.dims, to = ?dims, "resize");
        }
        self.tree.set_region(region);
        self.dims = dims;
        Ok(())
    }

    /// Appends `count` random bodies.
    ///
    /// ### Returns
    /// The ids of the new bodies.
    pub fn spawn(&mut self, count: usize, rng: &mut impl Rng) -> Range<BodyId> {
        let start = self.bodies.len();
        self.bodies
            .extend(body::spawn(count, self.dims, &self.cfg, rng));
        debug!(count, total = self.bodies.len(), "spawned bodies");
        start..self.bodies.len()
    }

    /// Spawns [`Config::starting_bodies`] bodies.
    pub fn populate(&mut self, rng: &mut impl Rng) -> Range<BodyId> {
        self.spawn(self.cfg.starting_bodies, rng)
    }

    /// Clears the collision flag on every body.
    ///
    /// Steps never clear flags themselves; renderers call this before a
    /// step when they want per-step highlighting.
    pub fn clear_flags(&mut self) {
        for b in &mut self.bodies {
            b.flagged = false;
        }
    }

    /// Advances every body by one step. See [`phases::step`].
    pub fn step(&mut self) -> StepReport {
        phases::step(&mut self.tree, &mut self.bodies, self.dims)
    }
}
