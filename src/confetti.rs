//! Celebration particle simulation
//!
//! Pure and deterministic: seeded RNG, fixed spawn ranges, per-frame
//! integration. The browser shell owns the canvas and the animation loop;
//! this module only spawns and moves particles. A burst's lifetime is bounded
//! by elapsed wall time, not frame count, so the duration holds across
//! variable frame rates.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::CONFETTI_GRAVITY;

/// Confetti palette (CSS colors, drawn uniformly at random)
pub const COLORS: [&str; 6] = [
    "#FFC700", "#FF3B3B", "#2E3192", "#41BBC7", "#7F3F98", "#00A651",
];

/// Spawn height above the top edge of the surface
const SPAWN_Y: f32 = -10.0;

/// A single confetti square
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Rotation in radians
    pub angle: f32,
    /// Rotation speed per frame
    pub spin: f32,
    /// Index into [`COLORS`]
    pub color: usize,
}

/// One celebration burst: a particle set plus its wall-clock budget
#[derive(Debug, Clone)]
pub struct Burst {
    pub particles: Vec<Particle>,
    duration_ms: f64,
}

impl Burst {
    /// Spawn `count` particles just above the top of a `width`-pixel surface
    pub fn new(count: usize, duration_ms: f64, width: f32, rng: &mut Pcg32) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                pos: Vec2::new(rng.random_range(0.0..width.max(1.0)), SPAWN_Y),
                vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(2.0..7.0)),
                size: rng.random_range(6.0..12.0),
                angle: rng.random_range(0.0..std::f32::consts::TAU),
                spin: rng.random_range(-0.3..0.3),
                color: rng.random_range(0..COLORS.len()),
            })
            .collect();
        Self {
            particles,
            duration_ms,
        }
    }

    /// Advance every particle by `dt` frames (1.0 = one 60 Hz frame).
    /// Gravity accelerates, position and rotation integrate.
    pub fn advance(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.vel.y += CONFETTI_GRAVITY * dt;
            p.pos += p.vel * dt;
            p.angle += p.spin * dt;
        }
    }

    /// True while the burst is inside its wall-clock budget
    pub fn alive(&self, elapsed_ms: f64) -> bool {
        elapsed_ms < self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn burst(count: usize) -> Burst {
        let mut rng = Pcg32::seed_from_u64(42);
        Burst::new(count, 4000.0, 800.0, &mut rng)
    }

    #[test]
    fn test_spawn_ranges() {
        let b = burst(300);
        assert_eq!(b.particles.len(), 300);
        for p in &b.particles {
            assert!((0.0..800.0).contains(&p.pos.x));
            assert_eq!(p.pos.y, SPAWN_Y);
            assert!((-3.0..3.0).contains(&p.vel.x));
            assert!((2.0..7.0).contains(&p.vel.y));
            assert!((6.0..12.0).contains(&p.size));
            assert!((-0.3..0.3).contains(&p.spin));
            assert!(p.color < COLORS.len());
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let a = burst(50);
        let b = burst(50);
        for (pa, pb) in a.particles.iter().zip(&b.particles) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.color, pb.color);
        }
    }

    #[test]
    fn test_advance_applies_gravity_and_spin() {
        let mut b = burst(10);
        let before: Vec<_> = b.particles.iter().map(|p| (p.pos, p.vel.y, p.angle)).collect();
        b.advance(1.0);
        for (p, (pos, vy, angle)) in b.particles.iter().zip(before) {
            assert!((p.vel.y - (vy + CONFETTI_GRAVITY)).abs() < 1e-5);
            assert!(p.pos.y > pos.y, "particles fall");
            assert!((p.angle - (angle + p.spin)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_alive_bounded_by_duration() {
        let b = burst(1);
        assert!(b.alive(0.0));
        assert!(b.alive(3999.9));
        assert!(!b.alive(4000.0));
    }

    #[test]
    fn test_zero_width_surface_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(1);
        let b = Burst::new(10, 1000.0, 0.0, &mut rng);
        assert_eq!(b.particles.len(), 10);
    }
}
