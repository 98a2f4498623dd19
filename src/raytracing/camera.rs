use super::error::{RayTracingError, Result};
use super::math::{is_zero, Point, Ray, Vector};

/// Physical size of the view plane and its distance from the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
}

/// Pinhole camera with a right handed basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Point,
    forward: Vector,
    up: Vector,
    right: Vector,
    view_plane: ViewPlane,
}

impl Camera {
    /// `to` and `up` must be orthogonal; both are normalized and
    /// `right = to × up`.
    pub fn new(position: Point, to: Vector, up: Vector, view_plane: ViewPlane) -> Result<Self> {
        if !is_zero(to.dot(up)) {
            return Err(RayTracingError::NonOrthogonalCamera);
        }
        if !(view_plane.width > 0.0 && view_plane.height > 0.0 && view_plane.distance > 0.0) {
            return Err(RayTracingError::InvalidCamera(format!(
                "view plane size and distance must be positive, got {}x{} at {}",
                view_plane.width, view_plane.height, view_plane.distance
            )));
        }
        let forward = to.normalize();
        let up = up.normalize();
        let right = forward.cross(up)?;
        Ok(Camera {
            position,
            forward,
            up,
            right,
            view_plane,
        })
    }

    /// Creates a camera that looks at a specific point from a specific position.
    /// The up vector is the part of `world_up` orthogonal to the view direction.
    pub fn look_at(position: Point, target: Point, world_up: Vector, view_plane: ViewPlane) -> Result<Self> {
        let forward = target
            .subtract(position)
            .map_err(|_| RayTracingError::InvalidCamera("camera target coincides with its position".into()))?
            .normalize();
        let world_up = world_up.normalize().xyz();
        let up = world_up - forward.xyz() * world_up.dot(forward.xyz());
        if is_zero(up.len()) {
            return Err(RayTracingError::InvalidCamera(
                "view direction is parallel to the up vector".into(),
            ));
        }
        Camera::new(position, forward, Vector::try_from(up)?, view_plane)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn forward(&self) -> Vector {
        self.forward
    }

    pub fn up(&self) -> Vector {
        self.up
    }

    pub fn right(&self) -> Vector {
        self.right
    }

    /// Ray from the eye through the center of pixel (`col`, `row`) of a
    /// `columns` x `rows` raster. Rows grow downward, columns rightward.
    pub fn construct_ray(&self, columns: u32, rows: u32, col: u32, row: u32) -> Ray {
        self.construct_ray_through(columns, rows, col as f64, row as f64)
    }

    /// Like [`Camera::construct_ray`], with fractional pixel coordinates so
    /// callers can sample anywhere inside a pixel.
    pub fn construct_ray_through(&self, columns: u32, rows: u32, col: f64, row: f64) -> Ray {
        let center = self.position.xyz() + self.forward.xyz() * self.view_plane.distance;

        let pixel_width = self.view_plane.width / columns as f64;
        let pixel_height = self.view_plane.height / rows as f64;

        let x = (col - (columns as f64 - 1.0) / 2.0) * pixel_width;
        let y = -(row - (rows as f64 - 1.0) / 2.0) * pixel_height;

        let mut pixel = center;
        if !is_zero(x) {
            pixel += self.right.xyz() * x;
        }
        if !is_zero(y) {
            pixel += self.up.xyz() * y;
        }
        let direction = Point::from(pixel)
            .subtract(self.position)
            .unwrap_or(self.forward);
        Ray::new(self.position, direction)
    }
}
