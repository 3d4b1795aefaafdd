use std::f64::consts::PI;

use crate::*;

/// How a particle that left the play area is put back inside.
///
/// Direction and speed are updated the same way by every policy; only the
/// position correction differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPolicy {
    /// Mirror on the right wall, hard clamp on the floor and the left wall,
    /// and place at `y = size` on the ceiling.
    Reference,
    /// Mirror the penetration depth on all four walls.
    Reflect,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub width: f64,
    pub height: f64,
    pub pixel_size: u32,
    pub particle_count: usize,

    pub gravity: Vector,
    /// Fraction of speed kept every tick.
    pub drag: f64,
    /// Fraction of speed kept on every wall or particle collision.
    pub elasticity: f64,

    pub seed: u64,
    /// Distance from every wall kept free when particles are spawned.
    pub spawn_margin: f64,
    pub wall_policy: WallPolicy,
    pub frame_limit: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 600.,
            height: 600.,
            pixel_size: 30,
            particle_count: 30,
            gravity: Vector::new(1.1, PI),
            drag: 0.999,
            elasticity: 0.75,
            seed: 0,
            spawn_margin: 50.,
            wall_policy: WallPolicy::Reference,
            frame_limit: Some(1000),
        }
    }
}

impl Settings {
    pub fn size(&self) -> f64 {
        self.pixel_size as f64
    }

    /// Largest x a particle's top-left corner may take.
    pub fn max_x(&self) -> f64 {
        self.width - self.size()
    }

    /// Largest y a particle's top-left corner may take.
    pub fn max_y(&self) -> f64 {
        self.height - self.size()
    }

    /// Panics when the settings cannot describe a valid run.
    pub fn validate(&self) {
        assert!(self.pixel_size > 0, "pixel_size must be positive");
        assert!(
            self.drag > 0. && self.drag <= 1.,
            "drag must be in (0, 1], got {}",
            self.drag
        );
        assert!(
            (0. ..=1.).contains(&self.elasticity),
            "elasticity must be in [0, 1], got {}",
            self.elasticity
        );
        assert!(
            self.max_x() >= 0. && self.max_y() >= 0.,
            "bounds {}x{} are smaller than one pixel of size {}",
            self.width,
            self.height,
            self.pixel_size
        );
        assert!(
            self.gravity.magnitude >= 0.,
            "gravity magnitude must be non-negative"
        );
        assert!(self.spawn_margin >= 0., "spawn_margin must be non-negative");
    }
}
