use super::{align_zero, Point, Vector};
use crate::raytracing::geometry::GeoPoint;

/// Distance secondary rays are moved off the surface they start from.
pub const DELTA: f64 = 0.1;

/// Half-line starting at `origin`. The direction is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Point, direction: Vector) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Secondary ray leaving a surface point. The origin is pushed `DELTA`
    /// along `normal`, toward the side `direction` points to, so the ray does
    /// not immediately hit the surface it starts from.
    pub fn offset(point: Point, direction: Vector, normal: Vector) -> Self {
        let side = if align_zero(normal.dot(direction)) > 0.0 {
            DELTA
        } else {
            -DELTA
        };
        let shift = normal.xyz() * side;
        Ray::new(Point::from(point.xyz() + shift), direction)
    }

    #[inline(always)]
    pub fn at(&self, t: f64) -> Point {
        Point::from(self.origin.xyz() + self.direction.xyz() * t)
    }

    pub fn closest_geo_point<'a>(&self, geo_points: Vec<GeoPoint<'a>>) -> Option<GeoPoint<'a>> {
        geo_points.into_iter().min_by(|a, b| {
            let da = a.point.distance_squared(self.origin);
            let db = b.point.distance_squared(self.origin);
            da.total_cmp(&db)
        })
    }
}
