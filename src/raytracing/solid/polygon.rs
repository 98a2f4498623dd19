use super::plane::Plane;
use crate::raytracing::error::{RayTracingError, Result};
use crate::raytracing::math::{align_zero, is_zero, Point, Ray, Vector};

/// Convex planar polygon. Vertices are stored in the order given; a triangle
/// is the three vertex case.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
}

fn invalid(message: &str) -> RayTracingError {
    RayTracingError::InvalidGeometry(message.to_string())
}

impl Polygon {
    /// Build a polygon from an ordered chain of vertices.
    ///
    /// Fails when there are fewer than three vertices, two consecutive
    /// vertices coincide, three consecutive vertices are collinear, the
    /// vertices are not coplanar, or the chain is not convex and consistently
    /// ordered.
    pub fn new(vertices: Vec<Point>) -> Result<Polygon> {
        if vertices.len() < 3 {
            return Err(invalid("a polygon needs at least 3 vertices"));
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() == 3 {
            return Ok(Polygon { vertices, plane });
        }

        let n = plane.normal;
        let edge = |from: Point, to: Point| {
            to.subtract(from)
                .map_err(|_| invalid("consecutive polygon vertices must be distinct"))
        };
        let turn = |e1: Vector, e2: Vector| {
            e1.cross(e2)
                .map(|c| c.dot(n))
                .map_err(|_| invalid("consecutive polygon edges must not be collinear"))
        };

        let last = vertices.len() - 1;
        let mut edge1 = edge(vertices[last - 1], vertices[last])?;
        let mut edge2 = edge(vertices[last], vertices[0])?;
        // every turn must have the same orientation as the closing one
        let positive = turn(edge1, edge2)? > 0.0;
        for i in 1..vertices.len() {
            if let Ok(offset) = vertices[i].subtract(vertices[0]) {
                if !is_zero(offset.dot(n)) {
                    return Err(invalid("all polygon vertices must lie in the same plane"));
                }
            }
            edge1 = edge2;
            edge2 = edge(vertices[i - 1], vertices[i])?;
            if positive != (turn(edge1, edge2)? > 0.0) {
                return Err(invalid("polygon vertices must be ordered and form a convex shape"));
            }
        }
        Ok(Polygon { vertices, plane })
    }

    pub fn triangle(a: Point, b: Point, c: Point) -> Result<Polygon> {
        Polygon::new(vec![a, b, c])
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn normal_at(&self, _point: Point) -> Vector {
        self.plane.normal
    }

    pub fn intersect(&self, ray: &Ray) -> Vec<Point> {
        let hits = self.plane.intersect(ray);
        let Some(&point) = hits.first() else {
            return Vec::new();
        };

        // the hit is inside when the ray passes on the same side of every
        // edge, seen from the ray origin
        let direction = ray.direction.xyz();
        let to_vertex: Vec<_> = self
            .vertices
            .iter()
            .map(|v| v.xyz() - ray.origin.xyz())
            .collect();
        let mut side = 0.0;
        for i in 0..to_vertex.len() {
            let next = to_vertex[(i + 1) % to_vertex.len()];
            let sign = align_zero(direction.dot(to_vertex[i].cross(next)));
            // on an edge or a vertex
            if sign == 0.0 {
                return Vec::new();
            }
            if side == 0.0 {
                side = sign.signum();
            } else if side != sign.signum() {
                return Vec::new();
            }
        }
        vec![point]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }

    fn square() -> Polygon {
        Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 1.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_valid_quadrangle() {
        let polygon = square();
        let n = polygon.normal_at(p(0.0, 0.0, 1.0));
        let expected = 1.0 / 3f64.sqrt();
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n.xyz().x.abs(), expected, epsilon = 1e-12);
        for pair in polygon.vertices().windows(2) {
            let edge = pair[1].subtract(pair[0]).unwrap();
            assert_abs_diff_eq!(n.dot(edge), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_wrong_vertex_order() {
        let result = Polygon::new(vec![p(0.0, 0.0, 1.0), p(0.0, 1.0, 0.0), p(1.0, 0.0, 0.0), p(-1.0, 1.0, 1.0)]);
        assert!(matches!(result, Err(RayTracingError::InvalidGeometry(_))));
    }

    #[test]
    fn test_vertex_out_of_plane() {
        let result = Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 2.0, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_concave_quadrangle() {
        let result = Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.5, 0.25, 0.5)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_vertex_on_side() {
        let result = Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.5, 0.5)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_vertex() {
        let result = Polygon::new(vec![p(0.0, 0.0, 1.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_collinear_triangle() {
        assert!(Polygon::triangle(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0), p(2.0, 2.0, 2.0)).is_err());
    }

    fn triangle() -> Polygon {
        Polygon::triangle(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)).unwrap()
    }

    fn down_from(x: f64, y: f64) -> Ray {
        Ray::new(p(x, y, 1.0), -Vector::Z)
    }

    #[test]
    fn test_ray_inside_triangle() {
        assert_eq!(triangle().intersect(&down_from(0.5, 0.5)), vec![p(0.5, 0.5, 0.0)]);
    }

    #[test]
    fn test_ray_outside_against_edge() {
        assert!(triangle().intersect(&down_from(2.0, 2.0)).is_empty());
    }

    #[test]
    fn test_ray_outside_against_vertex() {
        assert!(triangle().intersect(&down_from(-1.0, -1.0)).is_empty());
    }

    #[test]
    fn test_ray_on_edge_misses() {
        assert!(triangle().intersect(&down_from(1.0, 0.0)).is_empty());
        assert!(triangle().intersect(&down_from(1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_ray_on_vertex_misses() {
        assert!(triangle().intersect(&down_from(2.0, 0.0)).is_empty());
    }

    #[test]
    fn test_ray_on_edge_extension_misses() {
        assert!(triangle().intersect(&down_from(3.0, 0.0)).is_empty());
    }

    #[test]
    fn test_ray_through_quadrangle() {
        let polygon = square();
        // the centroid of the four vertices lies inside the convex shape
        let target = p(0.0, 0.5, 0.5);
        let origin = p(2.0, 3.0, 4.0);
        let ray = Ray::new(origin, target.subtract(origin).unwrap());
        let hits = polygon.intersect(&ray);
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].distance(target), 0.0, epsilon = 1e-10);
    }
}
