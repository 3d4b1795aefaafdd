//! Scenario files for the viewer.
//!
//! Every field is optional; anything left out falls back to
//! `Settings::default()` (the classic 600x600 box with 30 pixels) or to the
//! view defaults below.
//!
//! ```yaml
//! simulation:
//!   width: 600
//!   height: 600
//!   pixel_size: 30
//!   particle_count: 30
//!   gravity: { magnitude: 1.1, direction: 3.14159 }
//!   drag: 0.999
//!   elasticity: 0.75
//!   seed: 42               # omitted -> random, logged at startup
//!   spawn_margin: 50
//!   wall_policy: reference # or "reflect"
//!   frame_limit: 1000      # null -> run forever
//! view:
//!   fps: 30
//!   scale: 1.0
//!   snapshot_folder: temp
//!   title: pixels
//! ```

use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use pixels::{Settings, Vector, WallPolicy};
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub view: ViewConfig,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GravityConfig {
    pub magnitude: f64,
    pub direction: f64, // radians, clockwise from up; π points down
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallPolicyConfig {
    #[serde(rename = "reference")]
    Reference,
    #[serde(rename = "reflect")]
    Reflect,
}

impl From<WallPolicyConfig> for WallPolicy {
    fn from(policy: WallPolicyConfig) -> Self {
        match policy {
            WallPolicyConfig::Reference => WallPolicy::Reference,
            WallPolicyConfig::Reflect => WallPolicy::Reflect,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: f64,
    pub height: f64,
    pub pixel_size: u32,
    pub particle_count: usize,
    pub gravity: GravityConfig,
    pub drag: f64,
    pub elasticity: f64,
    pub seed: Option<u64>,
    pub spawn_margin: f64,
    pub wall_policy: WallPolicyConfig,
    pub frame_limit: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            width: settings.width,
            height: settings.height,
            pixel_size: settings.pixel_size,
            particle_count: settings.particle_count,
            gravity: GravityConfig {
                magnitude: settings.gravity.magnitude,
                direction: settings.gravity.direction,
            },
            drag: settings.drag,
            elasticity: settings.elasticity,
            seed: None,
            spawn_margin: settings.spawn_margin,
            wall_policy: match settings.wall_policy {
                WallPolicy::Reference => WallPolicyConfig::Reference,
                WallPolicy::Reflect => WallPolicyConfig::Reflect,
            },
            frame_limit: settings.frame_limit,
        }
    }
}

impl ScenarioConfig {
    /// Rejects values the simulation or the window cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.view.validate()
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.pixel_size > 0, "pixel_size must be positive");
        ensure!(
            self.drag > 0. && self.drag <= 1.,
            "drag must be in (0, 1], got {}",
            self.drag
        );
        ensure!(
            (0. ..=1.).contains(&self.elasticity),
            "elasticity must be in [0, 1], got {}",
            self.elasticity
        );
        ensure!(
            self.width >= self.pixel_size as f64 && self.height >= self.pixel_size as f64,
            "bounds {}x{} are smaller than one pixel of size {}",
            self.width,
            self.height,
            self.pixel_size
        );
        ensure!(
            self.gravity.magnitude >= 0.,
            "gravity magnitude must be non-negative, got {}",
            self.gravity.magnitude
        );
        ensure!(
            self.spawn_margin >= 0.,
            "spawn_margin must be non-negative, got {}",
            self.spawn_margin
        );
        Ok(())
    }

    pub fn into_settings(self, seed: u64) -> Settings {
        Settings {
            width: self.width,
            height: self.height,
            pixel_size: self.pixel_size,
            particle_count: self.particle_count,
            gravity: Vector::new(self.gravity.magnitude, self.gravity.direction),
            drag: self.drag,
            elasticity: self.elasticity,
            seed,
            spawn_margin: self.spawn_margin,
            wall_policy: self.wall_policy.into(),
            frame_limit: self.frame_limit,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub fps: f64,
    pub scale: f64,
    pub snapshot_folder: String,
    pub title: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fps: 30.,
            scale: 1.,
            snapshot_folder: "temp".to_string(),
            title: "pixels".to_string(),
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.scale > 0. && self.scale.is_finite(),
            "scale must be positive, got {}",
            self.scale
        );
        ensure!(self.fps >= 0., "fps must be non-negative, got {}", self.fps);
        Ok(())
    }

    /// Pause between two ticks in continuous mode.
    pub fn tick_interval(&self) -> Duration {
        if self.fps > 0. {
            Duration::from_secs_f64(1. / self.fps)
        } else {
            Duration::ZERO
        }
    }
}

/// Loads and checks the scenario at `path`, or the defaults when there is
/// none.
pub fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig> {
    let path = match path {
        Some(path) => path,
        None => return Ok(ScenarioConfig::default()),
    };

    let file = File::open(path)
        .with_context(|| format!("failed to open scenario {}", path.display()))?;
    let scenario: ScenarioConfig = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    scenario
        .validate()
        .with_context(|| format!("invalid scenario {}", path.display()))?;

    Ok(scenario)
}
