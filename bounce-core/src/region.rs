use crate::error::{SimError, SimResult};
use glam::Vec2;

/// Axis-aligned rectangle described by a center and half-extents.
///
/// The y-axis grows downward, matching screen coordinates, so the
/// "north" quadrants sit at smaller y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    center: Vec2,
    half_extents: Vec2,
}

impl Region {
    /// Creates a region, rejecting negative or non-finite geometry.
    ///
    /// ### Parameters
    /// - `center` - Center point of the rectangle.
    /// - `half_extents` - Half of the width and height.
    ///
    /// ### Returns
    /// The region, or [`SimError::InvalidRegion`] if any component is
    /// non-finite or a half-extent is negative.
    pub fn new(center: Vec2, half_extents: Vec2) -> SimResult<Self> {
        if !center.is_finite()
            || !half_extents.is_finite()
            || half_extents.x < 0.0
            || half_extents.y < 0.0
        {
            return Err(SimError::InvalidRegion {
                center,
                half_extents,
            });
        }
        Ok(Self {
            center,
            half_extents,
        })
    }

    /// Region covering `[0, dims.x] x [0, dims.y]`.
    pub fn from_dims(dims: Vec2) -> SimResult<Self> {
        let half = dims * 0.5;
        Self::new(half, half)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Top-left corner (smallest x and y).
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Bottom-right corner (largest x and y).
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn area(&self) -> f32 {
        4.0 * self.half_extents.x * self.half_extents.y
    }

    /// A region with zero extent on either axis accepts nothing.
    pub fn is_degenerate(&self) -> bool {
        self.half_extents.x == 0.0 || self.half_extents.y == 0.0
    }

    /// Inclusive point containment on both axes.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Splits the region into four children that tile it exactly.
    ///
    /// ### Returns
    /// The children in NE, NW, SE, SW order.
    pub fn quadrants(&self) -> [Region; 4] {
        let half = self.half_extents * 0.5;
        let c = self.center;
        let child = |dx: f32, dy: f32| Region {
            center: Vec2::new(c.x + dx, c.y + dy),
            half_extents: half,
        };
        [
            child(half.x, -half.y),
            child(-half.x, -half.y),
            child(half.x, half.y),
            child(-half.x, half.y),
        ]
    }
}
