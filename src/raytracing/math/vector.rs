use std::ops;

use super::Vec3;
use crate::raytracing::error::{RayTracingError, Result};

/// A direction in space. Never the zero vector: every constructor that could
/// produce one fails with [`RayTracingError::ZeroVector`] instead.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector(Vec3);

impl TryFrom<Vec3> for Vector {
    type Error = RayTracingError;

    fn try_from(value: Vec3) -> Result<Self> {
        if value.is_zero() {
            Err(RayTracingError::ZeroVector)
        } else {
            Ok(Vector(value))
        }
    }
}

impl ops::Neg for Vector {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Vector(-self.0)
    }
}

impl Vector {
    pub const X: Vector = Vector(Vec3::new(1.0, 0.0, 0.0));
    pub const Y: Vector = Vector(Vec3::new(0.0, 1.0, 0.0));
    pub const Z: Vector = Vector(Vec3::new(0.0, 0.0, 1.0));

    pub fn new(x: f64, y: f64, z: f64) -> Result<Vector> {
        Vector::try_from(Vec3::new(x, y, z))
    }

    #[inline(always)]
    pub fn xyz(self) -> Vec3 {
        self.0
    }

    #[inline(always)]
    pub fn dot(self, other: Vector) -> f64 {
        self.0.dot(other.0)
    }

    /// Fails when the two vectors are parallel.
    pub fn cross(self, other: Vector) -> Result<Vector> {
        Vector::try_from(self.0.cross(other.0))
    }

    #[inline(always)]
    pub fn length_squared(self) -> f64 {
        self.0.squared_len()
    }

    #[inline(always)]
    pub fn length(self) -> f64 {
        self.0.len()
    }

    pub fn normalize(self) -> Vector {
        Vector(self.0 / self.length())
    }

    /// Mirror this vector about `normal` (expected to be unit length):
    /// `r = v - 2(v·n)n`. The result keeps the length of `self`.
    pub fn reflect(self, normal: Vector) -> Vector {
        let reflected = self.0 - normal.0 * (2.0 * self.dot(normal));
        debug_assert!(!reflected.is_zero());
        Vector(reflected)
    }

    /// Some unit vector orthogonal to this one.
    pub fn any_orthogonal(self) -> Vector {
        let v = self.0;
        // cross with the axis this vector is least aligned with
        let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
            Vec3::new(1.0, 0.0, 0.0)
        } else if v.y.abs() <= v.z.abs() {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        let orthogonal = v.cross(axis);
        Vector(orthogonal / orthogonal.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_vector_is_rejected() {
        assert_eq!(Vector::new(0.0, 0.0, 0.0), Err(RayTracingError::ZeroVector));
        assert!(Vector::new(0.0, 0.0, 1e-300).is_ok());
    }

    #[test]
    fn test_parallel_cross_product_fails() {
        let v = Vector::new(1.0, 2.0, 3.0).unwrap();
        let w = Vector::new(-2.0, -4.0, -6.0).unwrap();
        assert_eq!(v.cross(w), Err(RayTracingError::ZeroVector));
    }

    #[test]
    fn test_cross_product_length_and_orthogonality() {
        let v = Vector::new(1.0, 2.0, 3.0).unwrap();
        let w = Vector::new(0.0, 3.0, -2.0).unwrap();
        let c = v.cross(w).unwrap();
        assert_abs_diff_eq!(c.length(), v.length() * w.length(), epsilon = 1e-10);
        assert_abs_diff_eq!(c.dot(v), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(c.dot(w), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_normalize_gives_unit_length() {
        let v = Vector::new(3.0, -4.0, 12.0).unwrap().normalize();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflection_preserves_length_and_flips_normal_component() {
        let n = Vector::new(0.3, 1.0, -0.2).unwrap().normalize();
        for l in [
            Vector::new(1.0, -1.0, 0.0).unwrap(),
            Vector::new(-3.0, 0.5, 2.0).unwrap(),
            Vector::new(0.0, 0.0, 7.0).unwrap(),
        ] {
            let r = l.reflect(n);
            assert_abs_diff_eq!(r.length(), l.length(), epsilon = 1e-10);
            assert_abs_diff_eq!(r.dot(n), -l.dot(n), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_any_orthogonal() {
        for v in [Vector::X, Vector::Z, Vector::new(1.0, 1.0, 1.0).unwrap()] {
            let o = v.any_orthogonal();
            assert_abs_diff_eq!(o.dot(v), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(o.length(), 1.0, epsilon = 1e-12);
        }
    }
}
