//! Small numeric helpers shared by the camera and effect code.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Move `from` toward `to` by `alpha` per tick, scaled by the tick delta.
pub fn lerp_delta(from: f32, to: f32, alpha: f32, delta: f32) -> f32 {
    let t = (alpha * delta).clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interp {
    Linear,
    /// `a^5`: slow start, sharp finish
    Pow5In,
}

impl Interp {
    pub fn apply(self, a: f32) -> f32 {
        match self {
            Interp::Linear => a,
            Interp::Pow5In => a.powi(5),
        }
    }

    /// Interpolate between `start` and `end` at progress `a`.
    pub fn between(self, start: f32, end: f32, a: f32) -> f32 {
        start + (end - start) * self.apply(a)
    }
}

/// Uniform random value in `[-range, range]`.
pub fn range(rng: &mut impl Rng, range: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * range
}

/// Angle of the vector `(x, y)` in degrees, in `[0, 360)`.
pub fn angle(x: f32, y: f32) -> f32 {
    let deg = y.atan2(x).to_degrees();
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// One vector produced by [`rand_len_vectors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstVector {
    pub x: f32,
    pub y: f32,
    /// Per-vector progress (0 at start, 1 at end)
    pub fin: f32,
    pub fout: f32,
}

/// `amount` vectors at random angles with random lengths up to `length`.
///
/// The pattern depends only on `seed`, so the same burst is produced every
/// frame while `fin` animates it.
pub fn rand_len_vectors(seed: u64, fin: f32, amount: usize, length: f32) -> Vec<BurstVector> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..amount)
        .map(|_| {
            let angle = rng.gen_range(0.0..360.0f32).to_radians();
            let len = rng.gen::<f32>() * length;
            BurstVector {
                x: angle.cos() * len,
                y: angle.sin() * len,
                fin,
                fout: 1.0 - fin,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_delta_clamps_progress() {
        assert_eq!(lerp_delta(0.0, 10.0, 0.1, 1.0), 1.0);
        assert_eq!(lerp_delta(0.0, 10.0, 0.1, 20.0), 10.0);
        assert_eq!(lerp_delta(5.0, 10.0, 0.1, 0.0), 5.0);
    }

    #[test]
    fn test_pow5_in_endpoints() {
        assert_eq!(Interp::Pow5In.between(1.0, 4.0, 0.0), 1.0);
        assert_eq!(Interp::Pow5In.between(1.0, 4.0, 1.0), 4.0);
        assert!(Interp::Pow5In.between(1.0, 4.0, 0.5) < Interp::Linear.between(1.0, 4.0, 0.5));
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = range(&mut rng, 3.0);
            assert!((-3.0..=3.0).contains(&v));
        }
        assert_eq!(range(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_angle_quadrants() {
        assert!((angle(1.0, 0.0) - 0.0).abs() < 1e-4);
        assert!((angle(0.0, 1.0) - 90.0).abs() < 1e-4);
        assert!((angle(0.0, -1.0) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_rand_len_vectors_is_stable() {
        let a = rand_len_vectors(1, 0.5, 100, 50.0);
        let b = rand_len_vectors(1, 0.5, 100, 50.0);
        assert_eq!(a.len(), 100);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (v.x * v.x + v.y * v.y).sqrt() <= 50.0 + 1e-3));
    }
}
