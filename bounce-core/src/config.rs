use crate::error::{SimError, SimResult};

/// Tuning knobs for the spatial index and body spawning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Bodies a node holds before it splits.
    pub capacity: usize,
    /// Depth past which nodes accept bodies without splitting.
    pub max_divisions: u32,
    /// Upper bound of the random spawn speed.
    pub max_speed: f32,
    pub min_radius: u32,
    pub max_radius: u32,
    /// Bodies spawned when the simulation is first populated.
    pub starting_bodies: usize,
    /// Bodies spawned per user request.
    pub spawn_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 4,
            max_divisions: 10,
            max_speed: 1.0,
            min_radius: 5,
            max_radius: 14,
            starting_bodies: 1000,
            spawn_batch: 10,
        }
    }
}

impl Config {
    /// Checks that every field is usable.
    ///
    /// ### Returns
    /// - `Ok(())` if the configuration can drive a simulation.
    /// - `Err(SimError::InvalidConfig)` naming the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        if self.capacity == 0 {
            return Err(SimError::InvalidConfig("capacity must be at least 1".into()));
        }
        if self.min_radius == 0 {
            return Err(SimError::InvalidConfig("min_radius must be positive".into()));
        }
        if self.min_radius > self.max_radius {
            return Err(SimError::InvalidConfig(format!(
                "min_radius {} exceeds max_radius {}",
                self.min_radius, self.max_radius
            )));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "max_speed must be finite and non-negative, got {}",
                self.max_speed
            )));
        }
        Ok(())
    }
}
