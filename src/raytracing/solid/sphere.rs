use crate::raytracing::error::{RayTracingError, Result};
use crate::raytracing::math::{align_zero, Point, Ray, Vector};

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Result<Sphere> {
        if !(radius > 0.0) {
            return Err(RayTracingError::InvalidGeometry(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        Ok(Sphere { center, radius })
    }

    /// Outward normal. At the center itself there is no outward direction,
    /// so the +z axis is returned.
    pub fn normal_at(&self, point: Point) -> Vector {
        point
            .subtract(self.center)
            .map(Vector::normalize)
            .unwrap_or(Vector::Z)
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        if ray.origin == self.center {
            return vec![ray.at(self.radius)];
        }
        let u = self.center.xyz() - ray.origin.xyz();
        // projection of the center on the ray
        let tm = align_zero(ray.direction.xyz().dot(u));
        // distance of the center from the ray line
        let d = align_zero((u.squared_len() - tm * tm).max(0.0).sqrt());
        if d >= self.radius {
            return Vec::new();
        }
        let th = align_zero((self.radius * self.radius - d * d).sqrt());
        let t1 = align_zero(tm - th);
        let t2 = align_zero(tm + th);
        [t1, t2]
            .into_iter()
            .filter(|t| *t > 0.0)
            .map(|t| ray.at(t))
            .collect()
    }
}
