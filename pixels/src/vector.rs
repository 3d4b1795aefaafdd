use std::f64::consts::FRAC_PI_2;
use std::ops::Add;

use crate::*;

/// Motion state in polar form.
///
/// `direction` is measured clockwise from "up" in radians and is never
/// wrapped, so it may grow past `2π` over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub magnitude: f64,
    pub direction: f64,
}

impl Vector {
    pub fn new(magnitude: f64, direction: f64) -> Vector {
        Vector {
            magnitude,
            direction,
        }
    }

    pub fn zero() -> Vector {
        Vector::new(0., 0.)
    }

    /// Sums two vectors.
    ///
    /// The operands are decomposed as `(sin, cos)` and the sum is recomposed
    /// with `π/2 - atan2(y, x)`. Together with [`Vector::displacement`] this
    /// is the coordinate scheme every trajectory depends on, so it must not be
    /// "simplified".
    pub fn add(v1: Vector, v2: Vector) -> Vector {
        let x = v1.direction.sin() * v1.magnitude + v2.direction.sin() * v2.magnitude;
        let y = v1.direction.cos() * v1.magnitude + v2.direction.cos() * v2.magnitude;

        Vector {
            magnitude: x.hypot(y),
            direction: FRAC_PI_2 - y.atan2(x),
        }
    }

    /// Screen displacement for one tick (y grows downward).
    pub fn displacement(&self) -> Vector2f {
        vector![
            self.direction.sin() * self.magnitude,
            -self.direction.cos() * self.magnitude
        ]
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}
