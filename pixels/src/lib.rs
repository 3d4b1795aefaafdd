extern crate nalgebra as na;

pub use na::{vector, Vector2};

type Vector2f = Vector2<f64>;

/// RGBA, each channel in `0.0..=1.0`.
pub type Color = [f32; 4];

pub mod file;
mod particle;
mod settings;
mod system;
mod vector;

pub use particle::*;
pub use settings::*;
pub use system::*;
pub use vector::*;
