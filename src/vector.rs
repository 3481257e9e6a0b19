/*
 * Vector Math Module
 *
 * Steering helpers on top of nannou's Vec2. Every operation that would
 * normalize or divide is guarded so a zero-length vector or a zero scalar
 * produces a zero result instead of NaN.
 */

use nannou::prelude::{vec2, Vec2};
use rand::Rng;
use std::f32::consts::{PI, TAU};

// Below this squared length a vector is treated as zero
const ZERO_LENGTH_SQUARED: f32 = 1e-12;

// Gaussian samples are clipped to this many standard deviations
const GAUSSIAN_BOUND: f32 = 3.0;

pub trait SteerVec: Sized {
    fn is_zero(self) -> bool;

    /// Unit vector in the same direction, or `None` for a zero vector.
    fn try_normalize(self) -> Option<Self>;

    /// Rescales to `length`; a zero vector stays zero.
    fn set_length(self, length: f32) -> Self;

    /// Caps the magnitude at `max`.
    fn limit(self, max: f32) -> Self;

    /// Division that yields zero when `divisor` is zero.
    fn div_or_zero(self, divisor: f32) -> Self;

    /// The vector rotated by +90 degrees.
    fn perpendicular(self) -> Self;

    /// Angle from the positive x axis, in radians.
    fn angle(self) -> f32;

    fn rotated(self, radians: f32) -> Self;
}

impl SteerVec for Vec2 {
    #[inline]
    fn is_zero(self) -> bool {
        self.length_squared() < ZERO_LENGTH_SQUARED
    }

    #[inline]
    fn try_normalize(self) -> Option<Vec2> {
        if self.is_zero() {
            None
        } else {
            Some(self / self.length())
        }
    }

    #[inline]
    fn set_length(self, length: f32) -> Vec2 {
        self.try_normalize().map_or(Vec2::ZERO, |unit| unit * length)
    }

    #[inline]
    fn limit(self, max: f32) -> Vec2 {
        let max = max.max(0.0);
        if self.length_squared() > max * max {
            self.set_length(max)
        } else {
            self
        }
    }

    #[inline]
    fn div_or_zero(self, divisor: f32) -> Vec2 {
        if divisor == 0.0 || !divisor.is_finite() {
            Vec2::ZERO
        } else {
            self / divisor
        }
    }

    #[inline]
    fn perpendicular(self) -> Vec2 {
        vec2(-self.y, self.x)
    }

    #[inline]
    fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        vec2(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Unit vector pointing at `radians`.
#[inline]
pub fn from_angle(radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    vec2(cos, sin)
}

/// Wraps an angle into [-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rounding in rem_euclid can leave the result a hair outside the range
    wrapped.clamp(-PI, PI)
}

/// Signed shortest rotation taking direction `from` onto direction `to`.
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Rotates `desired` so that its direction lies within `max_angle` of
/// `heading`. The magnitude of `desired` is preserved.
pub fn limit_turn(heading: Vec2, desired: Vec2, max_angle: f32) -> Vec2 {
    if desired.is_zero() || heading.is_zero() || max_angle >= PI {
        return desired;
    }

    let current = heading.angle();
    let delta = shortest_angle_delta(current, desired.angle());
    let max_angle = max_angle.max(0.0);

    if delta.abs() <= max_angle {
        return desired;
    }

    from_angle(current + delta.clamp(-max_angle, max_angle)) * desired.length()
}

/// Standard normal sample via the Box-Muller transform.
pub fn gaussian(rng: &mut impl Rng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Standard normal sample clipped to +/- three sigma.
pub fn bounded_gaussian(rng: &mut impl Rng) -> f32 {
    gaussian(rng).clamp(-GAUSSIAN_BOUND, GAUSSIAN_BOUND)
}

/// Vector with independent bounded Gaussian components.
pub fn gaussian_vec(rng: &mut impl Rng) -> Vec2 {
    vec2(bounded_gaussian(rng), bounded_gaussian(rng))
}

/// Unit vector in a uniformly random direction.
pub fn random_unit(rng: &mut impl Rng) -> Vec2 {
    from_angle(rng.gen_range(0.0..TAU))
}
