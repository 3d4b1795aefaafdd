use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ops::RangeInclusive;

use log::debug;
use na::clamp;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::*;

/// Color a particle takes once the host picks it up.
pub const HELD_COLOR: Color = [1., 0., 0., 1.];

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    settings: Settings,
    particles: Vec<Particle>,
    frame: usize,
    held: Option<usize>,
}

impl ParticleSystem {
    /// Spawns `settings.particle_count` particles from `settings.seed`.
    ///
    /// Positions are uniform inside the play area minus `spawn_margin`,
    /// colors uniform over the RGB cube, speeds uniform in `[0, size)` and
    /// headings uniform in `[0, 2π)`.
    pub fn initialize(settings: Settings) -> ParticleSystem {
        settings.validate();

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let size = settings.size();
        let x_range = spawn_range(settings.spawn_margin, settings.max_x());
        let y_range = spawn_range(settings.spawn_margin, settings.max_y());

        let particles = (0..settings.particle_count)
            .map(|_| {
                let position = vector![
                    rng.gen_range(x_range.clone()),
                    rng.gen_range(y_range.clone())
                ];
                let color = [
                    rng.gen_range(0..=255u8) as f32 / 255.,
                    rng.gen_range(0..=255u8) as f32 / 255.,
                    rng.gen_range(0..=255u8) as f32 / 255.,
                    1.,
                ];
                let velocity = Vector::new(rng.gen_range(0. ..size), rng.gen_range(0. ..TAU));
                Particle::new(position, size, color, velocity)
            })
            .collect::<Vec<_>>();

        debug!(
            "spawned {} particles with seed {}",
            particles.len(),
            settings.seed
        );

        ParticleSystem {
            settings,
            particles,
            frame: 0,
            held: None,
        }
    }

    /// Builds a system around hand-placed particles. `particle_count` and
    /// `seed` are ignored.
    pub fn from_particles(settings: Settings, particles: Vec<Particle>) -> ParticleSystem {
        settings.validate();
        assert!(
            particles.iter().all(|p| p.size == settings.size()),
            "every particle must have size {}",
            settings.size()
        );

        ParticleSystem {
            settings,
            particles,
            frame: 0,
            held: None,
        }
    }

    /// Advances every particle except the held one by one tick.
    pub fn advance_tick(&mut self) {
        for i in 0..self.particles.len() {
            if self.held == Some(i) {
                continue;
            }
            self.move_particle(i);
        }
        self.frame += 1;
    }

    pub fn start(&mut self, count: usize) {
        for _i in 0..count {
            self.advance_tick();
        }
    }

    fn move_particle(&mut self, index: usize) {
        let settings = &self.settings;
        let (head, tail) = self.particles.split_at_mut(index + 1);
        let p = &mut head[index];

        p.velocity = p.velocity + settings.gravity;
        p.velocity.magnitude *= settings.drag;
        p.position += p.velocity.displacement();

        bounce_off_walls(settings, p);

        for other in tail.iter_mut() {
            collide(settings, self.frame, p, other);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ticks advanced so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.settings
            .frame_limit
            .map_or(false, |limit| self.frame >= limit)
    }

    /// First particle whose center lies within one `size` of `point`.
    pub fn pick_particle(&self, point: Vector2f) -> Option<usize> {
        self.particles
            .iter()
            .position(|p| (p.center() - point).norm() <= p.size)
    }

    pub fn held(&self) -> Option<usize> {
        self.held
    }

    /// Stops advancing the particle at `index` until
    /// [`ParticleSystem::release`]. It is still a collision partner for
    /// earlier particles, so their collisions can nudge it by one unit and
    /// change its velocity.
    pub fn hold(&mut self, index: usize) {
        assert!(
            index < self.particles.len(),
            "cannot hold particle {} of {}",
            index,
            self.particles.len()
        );
        self.particles[index].color = HELD_COLOR;
        self.held = Some(index);
    }

    pub fn release(&mut self) {
        self.held = None;
    }

    /// Centers the held particle on `point`, kept inside the play area.
    /// Returns `false` when nothing is held.
    pub fn drag_held_to(&mut self, point: Vector2f) -> bool {
        let index = match self.held {
            Some(index) => index,
            None => return false,
        };
        let p = &mut self.particles[index];
        p.position = point - Vector2f::repeat(p.size / 2.);
        keep_inside(&self.settings, p);
        true
    }
}

fn spawn_range(margin: f64, max: f64) -> RangeInclusive<f64> {
    if margin <= max - margin {
        margin..=max - margin
    } else {
        0. ..=max
    }
}

fn keep_inside(settings: &Settings, p: &mut Particle) {
    p.position.x = clamp(p.position.x, 0., settings.max_x());
    p.position.y = clamp(p.position.y, 0., settings.max_y());
}

pub(crate) fn bounce_off_walls(settings: &Settings, p: &mut Particle) {
    let (max_x, max_y) = (settings.max_x(), settings.max_y());
    let reflect = settings.wall_policy == WallPolicy::Reflect;

    if p.position.x > max_x {
        // right wall
        p.position.x = 2. * max_x - p.position.x;
        p.velocity.direction = -p.velocity.direction;
        p.velocity.magnitude *= settings.elasticity;
    } else if p.position.x < 0. {
        // left wall
        p.position.x = if reflect { -p.position.x } else { 0. };
        p.velocity.direction = -p.velocity.direction;
        p.velocity.magnitude *= settings.elasticity;
    }

    if p.position.y > max_y {
        // floor
        p.position.y = if reflect { 2. * max_y - p.position.y } else { max_y };
        p.velocity.direction = PI - p.velocity.direction;
        p.velocity.magnitude *= settings.elasticity;
    } else if p.position.y < 0. {
        // ceiling
        p.position.y = if reflect { -p.position.y } else { settings.size() };
        p.velocity.direction = PI - p.velocity.direction;
        p.velocity.magnitude *= settings.elasticity;
    }

    // a single step may cross the whole play area
    keep_inside(settings, p);
}

/// Resolves a collision between `p` and `q` if their corners are at most
/// one `size` apart. Returns whether they collided.
pub(crate) fn collide(
    settings: &Settings,
    frame: usize,
    p: &mut Particle,
    q: &mut Particle,
) -> bool {
    let dx = p.position.x - q.position.x;
    let dy = p.position.y - q.position.y;
    let distance = dx.hypot(dy);

    if distance > settings.size() {
        return false;
    }

    debug!("frame ({}): collision with distance {}", frame, distance);

    // reflect both headings about the line between the particles
    let tangent = dy.atan2(dx);
    p.velocity.direction = 2. * tangent - p.velocity.direction;
    q.velocity.direction = 2. * tangent - q.velocity.direction;

    // fixed unit nudge apart, not proportional to the overlap
    let angle = tangent + FRAC_PI_2;
    let nudge = vector![angle.sin(), -angle.cos()];
    p.position += nudge;
    q.position -= nudge;
    keep_inside(settings, p);
    keep_inside(settings, q);

    // exchange speeds
    std::mem::swap(&mut p.velocity.magnitude, &mut q.velocity.magnitude);
    p.velocity.magnitude *= settings.elasticity;
    q.velocity.magnitude *= settings.elasticity;

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn still_settings() -> Settings {
        Settings {
            gravity: Vector::zero(),
            ..Default::default()
        }
    }

    fn moving(x: f64, y: f64, magnitude: f64, direction: f64) -> Particle {
        Particle::new(
            vector![x, y],
            30.,
            [1., 1., 1., 1.],
            Vector::new(magnitude, direction),
        )
    }

    #[test]
    fn test_floor_clamps_under_reference_policy() {
        let settings = Settings::default();
        let gravity = settings.gravity;
        let mut system =
            ParticleSystem::from_particles(settings, vec![moving(300., 590., 0., 0.)]);
        system.advance_tick();

        let after_gravity = Vector::add(Vector::zero(), gravity);
        let p = &system.particles()[0];
        assert_eq!(p.position().y, 570.);
        assert!((p.position().x - 300.).abs() < EPS);
        assert_eq!(p.velocity().direction, PI - after_gravity.direction);
        assert!((p.velocity().magnitude - 1.1 * 0.999 * 0.75).abs() < EPS);
    }

    #[test]
    fn test_floor_mirrors_under_reflect_policy() {
        let settings = Settings {
            wall_policy: WallPolicy::Reflect,
            ..still_settings()
        };
        let mut p = moving(300., 580., 0., 0.);
        bounce_off_walls(&settings, &mut p);
        assert_eq!(p.position, vector![300., 560.]);
        assert_eq!(p.velocity.direction, PI);
    }

    #[test]
    fn test_left_wall_and_ceiling() {
        let reference = still_settings();
        let mut p = moving(-4., -3., 2., 0.5);
        bounce_off_walls(&reference, &mut p);
        assert_eq!(p.position, vector![0., 30.]);
        assert_eq!(p.velocity.direction, PI + 0.5);
        assert!((p.velocity.magnitude - 2. * 0.75 * 0.75).abs() < EPS);

        let reflect = Settings {
            wall_policy: WallPolicy::Reflect,
            ..still_settings()
        };
        let mut p = moving(-4., -3., 2., 0.5);
        bounce_off_walls(&reflect, &mut p);
        assert_eq!(p.position, vector![4., 3.]);
    }

    #[test]
    fn test_right_wall_mirrors() {
        let settings = still_settings();
        let mut p = moving(575., 100., 1., 1.2);
        bounce_off_walls(&settings, &mut p);
        assert_eq!(p.position.x, 565.);
        assert_eq!(p.velocity.direction, -1.2);
        assert_eq!(p.velocity.magnitude, 0.75);
    }

    #[test]
    fn test_overshoot_is_kept_inside() {
        let settings = still_settings();
        let mut p = moving(1500., -900., 1., 0.);
        bounce_off_walls(&settings, &mut p);
        assert!(p.position.x >= 0. && p.position.x <= settings.max_x());
        assert!(p.position.y >= 0. && p.position.y <= settings.max_y());
    }

    #[test]
    fn test_collide_swaps_and_damps_speed() {
        let settings = still_settings();
        let mut p = moving(100., 100., 2., 0.3);
        let mut q = moving(115., 100., 5., 1.);

        assert!(collide(&settings, 0, &mut p, &mut q));

        assert!((p.velocity.magnitude - 5. * 0.75).abs() < EPS);
        assert!((q.velocity.magnitude - 2. * 0.75).abs() < EPS);
        assert!((p.velocity.direction - (2. * PI - 0.3)).abs() < EPS);
        assert!((q.velocity.direction - (2. * PI - 1.)).abs() < EPS);
        assert!((p.position - vector![99., 100.]).norm() < EPS);
        assert!((q.position - vector![116., 100.]).norm() < EPS);
    }

    #[test]
    fn test_collide_just_inside_size() {
        let settings = still_settings();
        let mut p = moving(200., 200., 4., 0.);
        let mut q = moving(200., 200. + 30. - 1e-6, 1., 0.);

        assert!(collide(&settings, 0, &mut p, &mut q));
        assert!((p.velocity.magnitude - 0.75).abs() < EPS);
        assert!((q.velocity.magnitude - 3.).abs() < EPS);
        // pushed apart vertically
        assert!(p.position.y < 200.);
        assert!(q.position.y > 230. - 1e-6);
    }

    #[test]
    fn test_no_collision_beyond_size() {
        let settings = still_settings();
        let mut p = moving(200., 200., 4., 0.);
        let mut q = moving(231., 200., 1., 0.);
        let (p0, q0) = (p.clone(), q.clone());

        assert!(!collide(&settings, 0, &mut p, &mut q));
        assert_eq!(p, p0);
        assert_eq!(q, q0);
    }

    #[test]
    fn test_held_particle_does_not_move() {
        let mut system = ParticleSystem::from_particles(
            Settings::default(),
            vec![moving(100., 100., 3., 1.), moving(400., 200., 6., 2.)],
        );
        system.hold(1);
        let held_before = system.particles()[1].clone();
        let free_before = system.particles()[0].clone();

        system.start(20);

        assert_eq!(system.held(), Some(1));
        assert_eq!(system.particles()[1], held_before);
        assert_eq!(held_before.color(), HELD_COLOR);
        assert_ne!(system.particles()[0].position(), free_before.position());

        system.release();
        assert_eq!(system.held(), None);
        system.advance_tick();
        assert_ne!(system.particles()[1].position(), held_before.position());
    }

    #[test]
    fn test_held_particle_is_still_hit_by_earlier_particles() {
        let mut system = ParticleSystem::from_particles(
            still_settings(),
            vec![moving(100., 100., 0., 0.), moving(115., 100., 4., 0.)],
        );
        system.hold(1);

        system.advance_tick();

        let held = &system.particles()[1];
        assert!((held.position() - vector![116., 100.]).norm() < 1e-9);
        assert!(held.velocity().magnitude.abs() < 1e-9);
        assert!((system.particles()[0].velocity().magnitude - 3.).abs() < 1e-9);
    }

    #[test]
    fn test_pick_particle_uses_center() {
        let system = ParticleSystem::from_particles(
            still_settings(),
            vec![moving(100., 100., 0., 0.), moving(110., 100., 0., 0.)],
        );

        // center of the first is (115, 115)
        assert_eq!(system.pick_particle(vector![115., 115.]), Some(0));
        // within reach of both, first wins
        assert_eq!(system.pick_particle(vector![125., 115.]), Some(0));
        // only the second reaches
        assert_eq!(system.pick_particle(vector![150., 115.]), Some(1));
        assert_eq!(system.pick_particle(vector![400., 400.]), None);
    }

    #[test]
    fn test_drag_held_to_clamps() {
        let mut system =
            ParticleSystem::from_particles(still_settings(), vec![moving(100., 100., 0., 0.)]);
        assert!(!system.drag_held_to(vector![0., 0.]));

        system.hold(0);
        assert!(system.drag_held_to(vector![300., 200.]));
        assert_eq!(*system.particles()[0].position(), vector![285., 185.]);

        assert!(system.drag_held_to(vector![-50., 9000.]));
        assert_eq!(*system.particles()[0].position(), vector![0., 570.]);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_hold_out_of_range_panics() {
        let mut system = ParticleSystem::from_particles(still_settings(), vec![]);
        system.hold(0);
    }

    #[test]
    fn test_frame_limit() {
        let mut system = ParticleSystem::initialize(Settings {
            particle_count: 3,
            frame_limit: Some(5),
            ..Default::default()
        });
        system.start(4);
        assert_eq!(system.frame(), 4);
        assert!(!system.is_finished());
        system.advance_tick();
        assert!(system.is_finished());

        let mut endless = ParticleSystem::initialize(Settings {
            particle_count: 1,
            frame_limit: None,
            ..Default::default()
        });
        endless.start(2000);
        assert!(!endless.is_finished());
    }

    #[test]
    fn test_initialize_ranges() {
        let settings = Settings {
            seed: 11,
            particle_count: 200,
            ..Default::default()
        };
        let system = ParticleSystem::initialize(settings.clone());

        assert_eq!(system.particles().len(), 200);
        for p in system.particles() {
            assert!(p.position.x >= 50. && p.position.x <= settings.max_x() - 50.);
            assert!(p.position.y >= 50. && p.position.y <= settings.max_y() - 50.);
            assert!(p.velocity.magnitude >= 0. && p.velocity.magnitude < 30.);
            assert!(p.velocity.direction >= 0. && p.velocity.direction < TAU);
            assert_eq!(p.color[3], 1.);
            assert_eq!(p.size, 30.);
        }
    }

    #[test]
    fn test_spawn_range_falls_back_when_margin_too_wide() {
        assert_eq!(spawn_range(50., 570.), 50. ..=520.);
        assert_eq!(spawn_range(50., 60.), 0. ..=60.);
    }
}
