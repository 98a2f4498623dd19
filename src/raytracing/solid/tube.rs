use crate::raytracing::error::{RayTracingError, Result};
use crate::raytracing::math::{align_zero, is_zero, Point, Ray, Vec3, Vector};

/// Infinite circular tube of `radius` around the `axis` ray's line.
#[derive(Debug, Clone, PartialEq)]
pub struct Tube {
    pub axis: Ray,
    pub radius: f64,
}

/// Tube cut to `height` along its axis and closed by two cap discs, one at
/// the axis origin and one `height` further along the axis direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    pub tube: Tube,
    pub height: f64,
}

impl Tube {
    pub fn new(axis: Ray, radius: f64) -> Result<Tube> {
        if !(radius > 0.0) {
            return Err(RayTracingError::InvalidGeometry(format!(
                "tube radius must be positive, got {}",
                radius
            )));
        }
        Ok(Tube { axis, radius })
    }

    /// Signed position of the projection of `point` on the axis.
    fn axial(&self, point: Point) -> f64 {
        align_zero(self.axis.direction.xyz().dot(point.xyz() - self.axis.origin.xyz()))
    }

    pub fn normal_at(&self, point: Point) -> Vector {
        let t = self.axial(point);
        let projection = if t == 0.0 {
            self.axis.origin
        } else {
            self.axis.at(t)
        };
        // a point on the axis has no radial direction
        point
            .subtract(projection)
            .map(Vector::normalize)
            .unwrap_or_else(|_| self.axis.direction.any_orthogonal())
    }

    /// Ray parameters where the ray meets the lateral surface, solving
    /// `|oc⊥ + t·d⊥|² = r²` in the plane orthogonal to the axis.
    fn side_hits(&self, ray: &Ray) -> Vec<f64> {
        let axis = self.axis.direction.xyz();
        let d = ray.direction.xyz();
        let oc = ray.origin.xyz() - self.axis.origin.xyz();
        let d_perp = d - axis * d.dot(axis);
        let oc_perp = oc - axis * oc.dot(axis);

        let a = d_perp.squared_len();
        // parallel to the axis: never reaches the surface, or runs inside it
        if is_zero(a) {
            return Vec::new();
        }
        let b = 2.0 * oc_perp.dot(d_perp);
        let c = oc_perp.squared_len() - self.radius * self.radius;
        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant < 0.0 {
            return Vec::new();
        }
        let roots = if discriminant == 0.0 {
            vec![-b / (2.0 * a)]
        } else {
            let sqrt_disc = discriminant.sqrt();
            vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)]
        };
        roots
            .into_iter()
            .map(align_zero)
            .filter(|t| *t > 0.0)
            .collect()
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        self.side_hits(ray).into_iter().map(|t| ray.at(t)).collect()
    }
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Cylinder> {
        if !(height > 0.0) {
            return Err(RayTracingError::InvalidGeometry(format!(
                "cylinder height must be positive, got {}",
                height
            )));
        }
        Ok(Cylinder {
            tube: Tube::new(axis, radius)?,
            height,
        })
    }

    fn cap_centers(&self) -> [Point; 2] {
        let axis = &self.tube.axis;
        [axis.origin, axis.at(self.height)]
    }

    /// Points on either cap get the axis direction as their normal, the
    /// lateral surface behaves like the tube.
    pub fn normal_at(&self, point: Point) -> Vector {
        let t = self.tube.axial(point);
        if t == 0.0 || is_zero(t - self.height) {
            return self.tube.axis.direction;
        }
        self.tube.normal_at(point)
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        let mut hits: Vec<f64> = self
            .tube
            .side_hits(ray)
            .into_iter()
            .filter(|t| {
                let s = self.tube.axial(ray.at(*t));
                s > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        let axis: Vec3 = self.tube.axis.direction.xyz();
        let nv = align_zero(axis.dot(ray.direction.xyz()));
        if nv != 0.0 {
            for center in self.cap_centers() {
                let t = align_zero(axis.dot(center.xyz() - ray.origin.xyz()) / nv);
                if t <= 0.0 {
                    continue;
                }
                let radial = ray.at(t).distance_squared(center);
                if align_zero(radial - self.tube.radius * self.tube.radius) < 0.0 {
                    hits.push(t);
                }
            }
        }

        hits.sort_by(f64::total_cmp);
        hits.into_iter().map(|t| ray.at(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn z_axis() -> Ray {
        Ray::new(Point::ORIGIN, Vector::Z)
    }

    fn tube() -> Tube {
        Tube::new(z_axis(), 1.0).unwrap()
    }

    fn cylinder() -> Cylinder {
        Cylinder::new(z_axis(), 1.0, 2.0).unwrap()
    }

    fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray {
        Ray::new(
            Point::new(origin.0, origin.1, origin.2),
            Vector::new(direction.0, direction.1, direction.2).unwrap(),
        )
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Tube::new(z_axis(), 0.0).is_err());
        assert!(Cylinder::new(z_axis(), 1.0, -1.0).is_err());
    }

    #[test]
    fn test_tube_normal() {
        assert_eq!(tube().normal_at(Point::new(1.0, 0.0, 1.0)), Vector::X);
        // point facing the head of the axis ray
        assert_eq!(tube().normal_at(Point::new(1.0, 0.0, 0.0)), Vector::X);
        let n = tube().normal_at(Point::new(0.6, -0.8, -7.0));
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.xyz().z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tube_normal_on_axis_falls_back_to_orthogonal() {
        let n = tube().normal_at(Point::new(0.0, 0.0, 3.0));
        assert_abs_diff_eq!(n.dot(Vector::Z), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tube_crossing_ray() {
        let hits = tube().intersect(&ray((-5.0, 0.0, 3.0), (1.0, 0.0, 0.0)));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].x, -1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[1].x, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tube_oblique_ray() {
        let hits = tube().intersect(&ray((-5.0, 0.0, 0.0), (1.0, 0.0, 1.0)));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].z, 4.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[1].z, 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tube_from_inside() {
        let hits = tube().intersect(&ray((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)));
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tube_miss_and_parallel() {
        assert!(tube().intersect(&ray((-5.0, 3.0, 0.0), (1.0, 0.0, 0.0))).is_empty());
        assert!(tube().intersect(&ray((0.5, 0.0, -5.0), (0.0, 0.0, 1.0))).is_empty());
        assert!(tube().intersect(&ray((5.0, 0.0, 0.0), (1.0, 0.0, 0.0))).is_empty());
    }

    #[test]
    fn test_tube_tangent_gives_one_point() {
        let hits = tube().intersect(&ray((1.0, -5.0, 0.0), (0.0, 1.0, 0.0)));
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].y, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cylinder_cap_normals() {
        let c = cylinder();
        assert_eq!(c.normal_at(Point::new(0.5, 0.0, 0.0)), Vector::Z);
        assert_eq!(c.normal_at(Point::new(0.0, -0.5, 2.0)), Vector::Z);
        assert_eq!(c.normal_at(Point::new(0.0, 1.0, 1.0)), Vector::Y);
    }

    #[test]
    fn test_cylinder_side_hits_are_clipped() {
        let c = cylinder();
        // within the height: both side points
        assert_eq!(c.intersect(&ray((-5.0, 0.0, 1.0), (1.0, 0.0, 0.0))).len(), 2);
        // above the top cap
        assert!(c.intersect(&ray((-5.0, 0.0, 3.0), (1.0, 0.0, 0.0))).is_empty());
    }

    #[test]
    fn test_cylinder_through_both_caps() {
        let hits = cylinder().intersect(&ray((0.2, 0.3, -4.0), (0.0, 0.0, 1.0)));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].z, 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[1].z, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cylinder_side_then_cap() {
        // enters through the side at z = 1, leaves through the top
        let hits = cylinder().intersect(&ray((-2.0, 0.0, 0.0), (1.0, 0.0, 1.0)));
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].x, -1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[0].z, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[1].z, 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(hits[1].x, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_cylinder_from_inside() {
        let hits = cylinder().intersect(&ray((0.0, 0.0, 1.0), (0.0, 0.0, -1.0)));
        assert_eq!(hits, vec![Point::new(0.0, 0.0, 0.0)]);
    }
}
