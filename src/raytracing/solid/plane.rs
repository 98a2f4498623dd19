use crate::raytracing::error::{RayTracingError, Result};
use crate::raytracing::math::{align_zero, Point, Ray, Vector};

/// Infinite plane through `anchor`, orthogonal to the unit `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub anchor: Point,
    pub normal: Vector,
}

impl Plane {
    pub fn new(anchor: Point, normal: Vector) -> Plane {
        Plane {
            anchor,
            normal: normal.normalize(),
        }
    }

    /// Plane through three points. Fails when two of them coincide or all
    /// three lie on a line.
    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Result<Plane> {
        let invalid = |_| RayTracingError::InvalidGeometry("plane points must be distinct and not collinear".into());
        let v1 = p2.subtract(p1).map_err(invalid)?;
        let v2 = p3.subtract(p1).map_err(invalid)?;
        let normal = v1.cross(v2).map_err(invalid)?;
        Ok(Plane::new(p1, normal))
    }

    pub fn normal_at(&self, _point: Point) -> Vector {
        self.normal
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        let nv = align_zero(self.normal.dot(ray.direction));
        // parallel, including rays lying inside the plane
        if nv == 0.0 {
            return Vec::new();
        }
        let Ok(to_anchor) = self.anchor.subtract(ray.origin) else {
            return Vec::new();
        };
        let numerator = align_zero(self.normal.dot(to_anchor));
        // the ray starts on the plane
        if numerator == 0.0 {
            return Vec::new();
        }
        let t = align_zero(numerator / nv);
        if t <= 0.0 {
            return Vec::new();
        }
        vec![ray.at(t)]
    }
}
