use std::ops;

use super::{Vec3, Vector};
use crate::raytracing::error::{RayTracingError, Result};

/// A location in space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vec3> for Point {
    #[inline(always)]
    fn from(value: Vec3) -> Self {
        Point::new(value.x, value.y, value.z)
    }
}

impl ops::Add<Vector> for Point {
    type Output = Point;

    #[inline(always)]
    fn add(self, rhs: Vector) -> Self::Output {
        Point::from(self.xyz() + rhs.xyz())
    }
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0, 0.0);

    #[inline(always)]
    pub const fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    #[inline(always)]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// The vector going from `other` to `self`.
    pub fn subtract(self, other: Point) -> Result<Vector> {
        if self == other {
            return Err(RayTracingError::CoincidentPoints);
        }
        Vector::try_from(self.xyz() - other.xyz())
    }

    #[inline(always)]
    pub fn distance_squared(self, other: Point) -> f64 {
        (self.xyz() - other.xyz()).squared_len()
    }

    #[inline(always)]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtract_coincident_points_fails() {
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(p.subtract(p), Err(RayTracingError::CoincidentPoints));
    }

    #[test]
    fn test_subtract_and_add_are_inverse() {
        let p1 = Point::new(1.0, 2.0, 3.0);
        let p2 = Point::new(2.0, 3.0, 4.0);
        let v = p2.subtract(p1).unwrap();
        assert_eq!(v.xyz(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p1 + v, p2);
    }

    #[test]
    fn test_distances() {
        let p1 = Point::ORIGIN;
        let p2 = Point::new(0.0, 3.0, 4.0);
        assert_eq!(p1.distance_squared(p2), 25.0);
        assert_eq!(p2.distance(p1), 5.0);
    }
}
