//! Screen shake: random camera jitter that decays linearly.

use crate::constants::*;
use crate::math::range;
use glam::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct Shake {
    intensity: f32,
    time: f32,
}

impl Shake {
    /// Request a shake. The stronger and the longer of the running and the
    /// requested shake win independently; shakes never add up.
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.intensity = self.intensity.max(intensity);
        self.time = self.time.max(duration);
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn remaining(&self) -> f32 {
        self.time
    }

    pub fn is_active(&self) -> bool {
        self.time > 0.0
    }

    /// Advance by `delta` ticks and return the camera offset for this tick.
    ///
    /// `strength` is the user's screenshake setting (4 = neutral) and `scale`
    /// damps the offset relative to the full intensity.
    pub fn step(&mut self, rng: &mut impl Rng, strength: i32, scale: f32, delta: f32) -> Vec2 {
        if self.time > 0.0 {
            let amount = self.intensity * (strength as f32 / SHAKE_SETTING_UNIT) * scale;
            let offset = Vec2::new(range(rng, amount), range(rng, amount));
            self.intensity -= SHAKE_DECAY * delta;
            self.time -= delta;
            self.intensity = self.intensity.clamp(0.0, SHAKE_MAX_INTENSITY);
            offset
        } else {
            self.intensity = 0.0;
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_shakes_take_max_not_sum() {
        let mut shake = Shake::default();
        shake.shake(3.0, 20.0);
        shake.shake(5.0, 10.0);
        assert_eq!(shake.intensity(), 5.0);
        assert_eq!(shake.remaining(), 20.0);

        shake.shake(1.0, 1.0);
        assert_eq!(shake.intensity(), 5.0);
        assert_eq!(shake.remaining(), 20.0);
    }

    #[test]
    fn test_intensity_and_time_decay_linearly() {
        let mut shake = Shake::default();
        shake.shake(10.0, 5.0);
        shake.step(&mut rng(), 4, 1.0, 2.0);
        assert_eq!(shake.intensity(), 9.5);
        assert_eq!(shake.remaining(), 3.0);
    }

    #[test]
    fn test_intensity_zero_after_expiry() {
        let mut shake = Shake::default();
        shake.shake(50.0, 1.0);
        let mut r = rng();
        shake.step(&mut r, 4, 1.0, 1.0);
        assert_eq!(shake.remaining(), 0.0);
        assert!(shake.intensity() > 0.0);

        let offset = shake.step(&mut r, 4, 1.0, 1.0);
        assert_eq!(offset, Vec2::ZERO);
        assert_eq!(shake.intensity(), 0.0);
    }

    #[test]
    fn test_offset_bounded_by_scaled_intensity() {
        let mut r = rng();
        for _ in 0..200 {
            let mut shake = Shake::default();
            shake.shake(8.0, 10.0);
            let offset = shake.step(&mut r, 8, SHAKE_DAMPING, 1.0);
            let bound = 8.0 * 2.0 * SHAKE_DAMPING;
            assert!(offset.x.abs() <= bound && offset.y.abs() <= bound);
        }
    }

    #[test]
    fn test_zero_strength_setting_disables_offset() {
        let mut shake = Shake::default();
        shake.shake(8.0, 10.0);
        let offset = shake.step(&mut rng(), 0, 1.0, 1.0);
        assert_eq!(offset.length(), 0.0);
        assert!(shake.is_active());
    }

    #[test]
    fn test_intensity_clamped_to_max() {
        let mut shake = Shake::default();
        shake.shake(500.0, 10.0);
        shake.step(&mut rng(), 4, 1.0, 1.0);
        assert_eq!(shake.intensity(), SHAKE_MAX_INTENSITY);
    }
}
