use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};
use obj::{load_obj, Obj, ObjError, Position};
use thiserror::Error;

use super::geometry::{Geometries, Geometry};
use super::material::Material;
use super::math::{Color, Mat4, Point, Vec3};
use super::solid::Solid;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("cannot read model: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse OBJ data: {0}")]
    Obj(#[from] ObjError),

    /// Every face of the mesh was degenerate, or it had none.
    #[error("model has no usable triangle")]
    Empty,
}

/// Triangle mesh loaded from a Wavefront OBJ file, placed in the scene by
/// `transform`.
#[derive(Debug)]
pub struct Model {
    obj: Obj<Position, u32>,
    transform: Mat4,
}

impl Model {
    pub fn load(path: &Path, transform: Mat4) -> Result<Model, ModelError> {
        let input = BufReader::new(File::open(path)?);
        Model::read(input, transform)
    }

    pub fn read(input: impl BufRead, transform: Mat4) -> Result<Model, ModelError> {
        let obj: Obj<Position, u32> = load_obj(input)?;
        Ok(Model { obj, transform })
    }

    pub fn triangle_count(&self) -> usize {
        self.obj.indices.len() / 3
    }

    fn vertex(&self, index: usize) -> Point {
        let position: Vec3 = self.obj.vertices[self.obj.indices[index] as usize].position.into();
        self.transform.apply(Point::from(position))
    }

    pub fn get_triangle(&self, i: usize) -> [Point; 3] {
        [self.vertex(i * 3), self.vertex(i * 3 + 1), self.vertex(i * 3 + 2)]
    }

    fn iter_triangles(&self) -> impl Iterator<Item = [Point; 3]> + '_ {
        (0..self.triangle_count()).map(|i| self.get_triangle(i))
    }

    /// One triangle geometry per face, all sharing `emission` and `material`.
    /// Degenerate faces are skipped.
    pub fn into_geometries(self, emission: Color, material: Material) -> Result<Geometries, ModelError> {
        let mut geometries = Geometries::new();
        for (i, [a, b, c]) in self.iter_triangles().enumerate() {
            match Solid::triangle(a, b, c) {
                Ok(solid) => geometries.add(
                    Geometry::new(solid)
                        .with_emission(emission)
                        .with_material(material),
                ),
                Err(err) => warn!("skipping face {}: {}", i, err),
            }
        }
        if geometries.is_empty() {
            return Err(ModelError::Empty);
        }
        debug!(
            "built {} of {} triangles",
            geometries.len(),
            self.triangle_count()
        );
        Ok(geometries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::math::{Ray, Vector};
    use approx::assert_abs_diff_eq;

    const QUAD: &str = "
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";

    #[test]
    fn test_faces_become_triangles() {
        let model = Model::read(QUAD.as_bytes(), Mat4::identity()).unwrap();
        assert_eq!(model.triangle_count(), 2);
        let geometries = model
            .into_geometries(Color::zero(), Material::diffuse(0.5))
            .unwrap();
        assert_eq!(geometries.len(), 2);

        let ray = Ray::new(Point::new(0.25, 0.75, 5.0), -Vector::Z);
        let hits = geometries.intersect(&ray);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].geometry.material, Material::diffuse(0.5));
    }

    #[test]
    fn test_transform_is_applied_to_vertices() {
        let transform = Mat4::scale(2.0).then(&Mat4::translate(Vec3::new(0.0, 0.0, -3.0)));
        let model = Model::read(QUAD.as_bytes(), transform).unwrap();
        let [a, b, c] = model.get_triangle(0);
        assert_eq!(a, Point::new(0.0, 0.0, -3.0));
        assert_eq!(b, Point::new(2.0, 0.0, -3.0));
        assert_abs_diff_eq!(c.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_faces_are_skipped() {
        let input = "
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
f 1 2 3
f 1 2 4
";
        let geometries = Model::read(input.as_bytes(), Mat4::identity())
            .unwrap()
            .into_geometries(Color::zero(), Material::default())
            .unwrap();
        assert_eq!(geometries.len(), 1);
    }

    #[test]
    fn test_mesh_without_faces_is_rejected() {
        let model = Model::read("v 0 0 0\n".as_bytes(), Mat4::identity()).unwrap();
        let result = model.into_geometries(Color::zero(), Material::default());
        assert!(matches!(result, Err(ModelError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let result = Model::load(Path::new("does/not/exist.obj"), Mat4::identity());
        assert!(matches!(result, Err(ModelError::Io(_))));
    }
}
