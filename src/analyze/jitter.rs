//! Jitter sources for the risk scorer.

use rand::Rng;

/// Produces the random offset added to a score, drawn from `[-half_width, half_width]`.
pub trait Jitter: Send + Sync {
    fn offset(&self, half_width: f32) -> f32;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformJitter;

impl Jitter for UniformJitter {
    fn offset(&self, half_width: f32) -> f32 {
        if half_width.is_nan() || half_width <= 0.0 {
            return 0.0;
        }
        rand::rng().random_range(-half_width..=half_width)
    }
}

/// Always zero. Used in tests and wherever reproducible scores matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn offset(&self, _half_width: f32) -> f32 {
        0.0
    }
}

/// Always the given offset, clamped to the requested half-width.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f32);

impl Jitter for FixedJitter {
    fn offset(&self, half_width: f32) -> f32 {
        let hw = half_width.max(0.0);
        self.0.clamp(-hw, hw)
    }
}
