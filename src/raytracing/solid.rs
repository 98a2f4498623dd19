//! Closed set of surface kinds and their ray/surface math.

pub mod plane;
pub mod polygon;
pub mod sphere;
pub mod tube;

pub use plane::Plane;
pub use polygon::Polygon;
pub use sphere::Sphere;
pub use tube::{Cylinder, Tube};

use super::error::Result;
use super::math::{Point, Ray, Vector};

#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    Plane(Plane),
    Sphere(Sphere),
    /// Convex polygon, triangles included.
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Solid {
    pub fn sphere(center: Point, radius: f64) -> Result<Solid> {
        Ok(Solid::Sphere(Sphere::new(center, radius)?))
    }

    pub fn plane(anchor: Point, normal: Vector) -> Solid {
        Solid::Plane(Plane::new(anchor, normal))
    }

    pub fn triangle(a: Point, b: Point, c: Point) -> Result<Solid> {
        Ok(Solid::Polygon(Polygon::triangle(a, b, c)?))
    }

    pub fn polygon(vertices: Vec<Point>) -> Result<Solid> {
        Ok(Solid::Polygon(Polygon::new(vertices)?))
    }

    pub fn tube(axis: Ray, radius: f64) -> Result<Solid> {
        Ok(Solid::Tube(Tube::new(axis, radius)?))
    }

    pub fn cylinder(axis: Ray, radius: f64, height: f64) -> Result<Solid> {
        Ok(Solid::Cylinder(Cylinder::new(axis, radius, height)?))
    }

    /// Unit normal to the surface at `point`.
    pub fn normal_at(&self, point: Point) -> Vector {
        match self {
            Solid::Plane(plane) => plane.normal_at(point),
            Solid::Sphere(sphere) => sphere.normal_at(point),
            Solid::Polygon(polygon) => polygon.normal_at(point),
            Solid::Tube(tube) => tube.normal_at(point),
            Solid::Cylinder(cylinder) => cylinder.normal_at(point),
        }
    }

    /// Points where `ray` meets the surface at a strictly positive distance.
    /// An empty list means the ray misses.
    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        match self {
            Solid::Plane(plane) => plane.intersect(ray),
            Solid::Sphere(sphere) => sphere.intersect(ray),
            Solid::Polygon(polygon) => polygon.intersect(ray),
            Solid::Tube(tube) => tube.intersect(ray),
            Solid::Cylinder(cylinder) => cylinder.intersect(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_every_normal_is_unit_length() {
        let axis = Ray::new(Point::new(1.0, -2.0, 0.5), Vector::new(1.0, 1.0, 0.0).unwrap());
        let solids = [
            Solid::plane(Point::ORIGIN, Vector::new(3.0, 0.0, 4.0).unwrap()),
            Solid::sphere(Point::new(1.0, 2.0, 3.0), 2.0).unwrap(),
            Solid::triangle(Point::ORIGIN, Point::new(3.0, 0.0, 1.0), Point::new(0.0, 5.0, 0.0)).unwrap(),
            Solid::tube(axis, 0.5).unwrap(),
            Solid::cylinder(axis, 0.5, 4.0).unwrap(),
        ];
        let probes = [
            Point::new(0.3, 0.7, -2.0),
            Point::new(4.0, 1.0, 1.0),
            Point::new(-1.0, 2.5, 0.0),
        ];
        for solid in &solids {
            for probe in probes {
                assert_abs_diff_eq!(solid.normal_at(probe).length(), 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_dispatch_reaches_the_shape() {
        let ray = Ray::new(Point::new(0.0, 0.0, -5.0), Vector::Z);
        let sphere = Solid::sphere(Point::ORIGIN, 1.0).unwrap();
        assert_eq!(sphere.intersect(&ray).len(), 2);
        let plane = Solid::plane(Point::ORIGIN, Vector::Z);
        assert_eq!(plane.intersect(&ray), vec![Point::ORIGIN]);
    }
}
