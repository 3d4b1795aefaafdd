use crate::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub(super) position: Vector2f,
    pub(super) size: f64,
    pub(super) color: Color,
    pub(super) velocity: Vector,
}

impl Particle {
    pub fn new(position: Vector2f, size: f64, color: Color, velocity: Vector) -> Particle {
        Particle {
            position,
            size,
            color,
            velocity,
        }
    }

    pub fn at_rest(position: Vector2f, size: f64) -> Particle {
        Particle::new(position, size, [1., 1., 1., 1.], Vector::zero())
    }

    /// Top-left corner.
    pub fn position(&self) -> &Vector2f {
        &self.position
    }

    pub fn center(&self) -> Vector2f {
        self.position + Vector2f::repeat(self.size / 2.)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    /// `[x, y, width, height]`, the layout drawing backends expect.
    pub fn rect(&self) -> [f64; 4] {
        [self.position.x, self.position.y, self.size, self.size]
    }

    pub fn formatted_list(&self) -> [String; 8] {
        [
            self.position.x.to_string(),
            self.position.y.to_string(),
            self.size.to_string(),
            ((self.color[0] * 255.).round() as u8).to_string(),
            ((self.color[1] * 255.).round() as u8).to_string(),
            ((self.color[2] * 255.).round() as u8).to_string(),
            self.velocity.magnitude.to_string(),
            self.velocity.direction.to_string(),
        ]
    }
}
