//! Vector kinematics
//!
//! `glam::Vec2` is the vector value type; arithmetic, `length` and `distance`
//! come from glam. This module adds the arcade-specific operations: rotation
//! by an angle, rescaling to an exact magnitude, and the signed angles used by
//! wall reflection. Angles are radians.

use glam::Vec2;

/// Kinematic helpers on top of `Vec2`.
///
/// Mutating forms work in place; the `*ed`/plain-return forms leave the
/// receiver untouched.
pub trait Kinematics: Sized {
    /// Rotate in place by `theta` radians (standard rotation matrix)
    fn rotate_by(&mut self, theta: f32);

    /// Rotated copy
    fn rotated(self, theta: f32) -> Self;

    /// Copy rescaled to exactly `len`. A zero vector has no direction and
    /// stays zero.
    fn scale_to(self, len: f32) -> Self;

    /// Slope angle `atan(y / x)` in (-π/2, π/2]; zero for the zero vector
    fn theta(self) -> f32;

    /// Signed angle from `self` to `other`
    fn theta_to2(self, other: Self) -> f32;

    /// Negate both components in place
    fn invert(&mut self);
}

impl Kinematics for Vec2 {
    #[inline]
    fn rotate_by(&mut self, theta: f32) {
        *self = self.rotated(theta);
    }

    #[inline]
    fn rotated(self, theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn scale_to(self, len: f32) -> Self {
        let current = self.length();
        if current > 0.0 {
            self * (len / current)
        } else {
            Vec2::ZERO
        }
    }

    #[inline]
    fn theta(self) -> f32 {
        if self.x == 0.0 {
            if self.y == 0.0 {
                0.0
            } else {
                std::f32::consts::FRAC_PI_2.copysign(self.y)
            }
        } else {
            (self.y / self.x).atan()
        }
    }

    #[inline]
    fn theta_to2(self, other: Self) -> f32 {
        other.y.atan2(other.x) - self.y.atan2(self.x)
    }

    #[inline]
    fn invert(&mut self) {
        *self = -*self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotated(PI / 2.0);
        assert!(v.x.abs() < 0.0001);
        assert!((v.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_rotate_by_mutates() {
        let mut v = Vec2::new(0.0, -2.0);
        v.rotate_by(PI);
        assert!((v.y - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_scale_to_zero_vector_stays_zero() {
        assert_eq!(Vec2::ZERO.scale_to(8.0), Vec2::ZERO);
    }

    #[test]
    fn test_scale_to_keeps_direction() {
        let v = Vec2::new(3.0, 4.0).scale_to(10.0);
        assert!((v.x - 6.0).abs() < 0.001);
        assert!((v.y - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_theta_vertical_and_zero() {
        assert!((Vec2::new(0.0, 5.0).theta() - PI / 2.0).abs() < 0.0001);
        assert!((Vec2::new(0.0, -5.0).theta() + PI / 2.0).abs() < 0.0001);
        assert_eq!(Vec2::ZERO.theta(), 0.0);
    }

    #[test]
    fn test_theta_to2_signed() {
        let right = Vec2::new(1.0, 0.0);
        let down = Vec2::new(0.0, 1.0);
        assert!((right.theta_to2(down) - PI / 2.0).abs() < 0.0001);
        assert!((down.theta_to2(right) + PI / 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_invert() {
        let mut v = Vec2::new(2.0, -3.0);
        v.invert();
        assert_eq!(v, Vec2::new(-2.0, 3.0));
    }

    proptest! {
        #[test]
        fn rotate_then_unrotate_is_identity(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            theta in -10.0f32..10.0,
        ) {
            let v = Vec2::new(x, y);
            let back = v.rotated(theta).rotated(-theta);
            let tolerance = 1e-3 * (1.0 + v.length());
            prop_assert!((back - v).length() <= tolerance);
        }

        #[test]
        fn scale_to_hits_requested_length(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            len in 0.0f32..500.0,
        ) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1e-3);
            let scaled = v.scale_to(len);
            prop_assert!((scaled.length() - len).abs() <= 1e-3 * (1.0 + len));
        }
    }
}
