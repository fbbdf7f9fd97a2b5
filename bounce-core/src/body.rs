use crate::{config::Config, region::Region};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// A movable disc.
///
/// `flagged` marks a body that collided during the last step. It is
/// display state only: the core sets it and never clears it.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub flagged: bool,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            flagged: false,
        }
    }

    /// Point used for region containment: the center shifted by half
    /// the radius on both axes.
    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius * 0.5)
    }

    /// Returns `true` if the body's [`Body::anchor`] lies inside `region`.
    ///
    /// A body partially overlapping the region edge can count as inside
    /// its neighbour instead; collision culling accepts that.
    #[inline]
    pub fn is_inside(&self, region: &Region) -> bool {
        region.contains(self.anchor())
    }

    /// Creates a body with random radius, position and velocity inside
    /// a `dims.x` by `dims.y` area.
    ///
    /// - The radius is a whole number in `[cfg.min_radius, cfg.max_radius]`.
    /// - Each coordinate is drawn from `[0, dim - radius]`, then shifted
    ///   by `radius`.
    /// - The velocity points along a random heading with a random speed
    ///   below `cfg.max_speed`, biased by `+1` per axis, then each axis is
    ///   independently mirrored. An axis that would truncate to zero is
    ///   nudged by `+1` so no body starts frozen on that axis.
    pub fn random(dims: Vec2, cfg: &Config, rng: &mut impl Rng) -> Self {
        let radius = rng.random_range(cfg.min_radius..=cfg.max_radius) as f32;

        let span = (dims - Vec2::splat(radius)).max(Vec2::ZERO);
        let pos = Vec2::new(
            rng.random_range(0.0..=span.x) + radius,
            rng.random_range(0.0..=span.y) + radius,
        );

        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random::<f32>() * cfg.max_speed;
        let mut vel = Vec2::from_angle(angle) * speed + Vec2::ONE;

        if rng.random_bool(0.5) {
            vel.x = -vel.x;
        }
        if rng.random_bool(0.5) {
            vel.y = -vel.y;
        }
        if vel.x.trunc() == 0.0 {
            vel.x += 1.0;
        }
        if vel.y.trunc() == 0.0 {
            vel.y += 1.0;
        }

        Self::new(pos, vel, radius)
    }
}

/// Creates `count` random bodies for a `dims.x` by `dims.y` area.
///
/// See [`Body::random`] for the distribution.
pub fn spawn(count: usize, dims: Vec2, cfg: &Config, rng: &mut impl Rng) -> Vec<Body> {
    (0..count).map(|_| Body::random(dims, cfg, rng)).collect()
}
