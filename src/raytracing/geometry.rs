//! Scene objects and the composite that groups them.

use super::material::Material;
use super::math::{Color, Point, Ray, Vector};
use super::solid::Solid;

/// A solid together with how it looks.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub solid: Solid,
    pub emission: Color,
    pub material: Material,
}

/// An intersection point tagged with the geometry it lies on.
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint<'a> {
    pub geometry: &'a Geometry,
    pub point: Point,
}

impl PartialEq for GeoPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && self.point == other.point
    }
}

impl Geometry {
    pub fn new(solid: Solid) -> Self {
        Geometry {
            solid,
            emission: Color::zero(),
            material: Material::default(),
        }
    }

    pub fn with_emission(self, emission: Color) -> Self {
        Geometry { emission, ..self }
    }

    pub fn with_material(self, material: Material) -> Self {
        Geometry { material, ..self }
    }

    pub fn normal_at(&self, point: Point) -> Vector {
        self.solid.normal_at(point)
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<GeoPoint<'_>> {
        self.solid
            .intersect(ray)
            .into_iter()
            .map(|point| GeoPoint {
                geometry: self,
                point,
            })
            .collect()
    }
}

/// Child of a [`Geometries`] composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersectable {
    Geometry(Geometry),
    Composite(Geometries),
}

impl From<Geometry> for Intersectable {
    fn from(value: Geometry) -> Self {
        Intersectable::Geometry(value)
    }
}

impl From<Geometries> for Intersectable {
    fn from(value: Geometries) -> Self {
        Intersectable::Composite(value)
    }
}

impl Intersectable {
    fn collect_intersections<'a>(&'a self, ray: &Ray, hits: &mut Vec<GeoPoint<'a>>) {
        match self {
            Intersectable::Geometry(geometry) => hits.extend(geometry.intersect(ray)),
            Intersectable::Composite(geometries) => {
                for child in &geometries.children {
                    child.collect_intersections(ray, hits);
                }
            }
        }
    }
}

/// Ordered collection of geometries and nested composites. Intersecting it
/// returns the union of every child's hits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometries {
    children: Vec<Intersectable>,
}

impl FromIterator<Intersectable> for Geometries {
    fn from_iter<T: IntoIterator<Item = Intersectable>>(iter: T) -> Self {
        Geometries {
            children: iter.into_iter().collect(),
        }
    }
}

impl Geometries {
    pub fn new() -> Self {
        Geometries::default()
    }

    pub fn add(&mut self, child: impl Into<Intersectable>) {
        self.children.push(child.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<GeoPoint<'_>> {
        let mut hits = Vec::new();
        for child in &self.children {
            child.collect_intersections(ray, &mut hits);
        }
        hits
    }

    pub fn find_intersections(&self, ray: &Ray) -> Vec<Point> {
        self.intersect(ray).into_iter().map(|gp| gp.point).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(center: Point, radius: f64) -> Geometry {
        Geometry::new(Solid::sphere(center, radius).unwrap())
    }

    fn scene() -> Geometries {
        let mut geometries = Geometries::new();
        geometries.add(sphere(Point::new(0.0, 0.0, 1.0), 1.0));
        geometries.add(Geometry::new(
            Solid::triangle(
                Point::new(-4.0, -4.0, 5.0),
                Point::new(4.0, -4.0, 5.0),
                Point::new(0.0, 4.0, 5.0),
            )
            .unwrap(),
        ));
        geometries.add(Geometry::new(Solid::plane(
            Point::new(0.0, 0.0, 10.0),
            Vector::new(0.0, 1.0, 1.0).unwrap(),
        )));
        geometries
    }

    #[test]
    fn test_empty_composite() {
        let ray = Ray::new(Point::ORIGIN, Vector::Z);
        assert!(Geometries::new().intersect(&ray).is_empty());
    }

    #[test]
    fn test_no_child_is_hit() {
        let ray = Ray::new(Point::new(0.0, 0.0, -1.0), -Vector::Z);
        assert!(scene().intersect(&ray).is_empty());
    }

    #[test]
    fn test_one_child_is_hit() {
        let ray = Ray::new(Point::new(0.0, 5.0, 0.0), Vector::Y);
        assert_eq!(scene().find_intersections(&ray).len(), 1);
    }

    #[test]
    fn test_some_children_are_hit() {
        let ray = Ray::new(Point::new(0.0, 0.0, -1.0), Vector::new(0.0, 0.1, 1.0).unwrap());
        // sphere twice and triangle once; the plane is reached too
        assert_eq!(scene().find_intersections(&ray).len(), 4);
    }

    #[test]
    fn test_nested_composites_are_flattened() {
        let mut inner = Geometries::new();
        inner.add(sphere(Point::new(0.0, 0.0, 5.0), 1.0));
        let mut outer = Geometries::new();
        outer.add(inner);
        outer.add(sphere(Point::new(0.0, 0.0, 10.0), 1.0));
        let ray = Ray::new(Point::ORIGIN, Vector::Z);
        assert_eq!(outer.intersect(&ray).len(), 4);
    }

    #[test]
    fn test_geo_point_identity() {
        let a = sphere(Point::ORIGIN, 1.0);
        let b = sphere(Point::ORIGIN, 1.0);
        let p = Point::new(0.0, 0.0, 1.0);
        let ga = GeoPoint { geometry: &a, point: p };
        let gb = GeoPoint { geometry: &b, point: p };
        assert_eq!(ga, GeoPoint { geometry: &a, point: p });
        // equal values, different geometries
        assert_ne!(ga, gb);
    }
}
