use super::{Point, Vec3, Vector};

/// Affine transform in homogeneous coordinates, row major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    rows: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4 {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn scale(factor: f64) -> Mat4 {
        let mut m = Mat4::identity();
        for i in 0..3 {
            m.rows[i][i] = factor;
        }
        m
    }

    pub fn translate(offset: Vec3) -> Mat4 {
        let mut m = Mat4::identity();
        m.rows[0][3] = offset.x;
        m.rows[1][3] = offset.y;
        m.rows[2][3] = offset.z;
        m
    }

    /// Rotation of `angle` radians around `axis` (right hand rule).
    pub fn rotate(axis: Vector, angle: f64) -> Mat4 {
        // https://en.wikipedia.org/wiki/Rotation_matrix#Rotation_matrix_from_axis_and_angle
        let u = axis.normalize().xyz();
        let (sin_t, cos_t) = angle.sin_cos();
        let c = 1.0 - cos_t;
        Mat4 {
            rows: [
                [
                    cos_t + u.x * u.x * c,
                    u.x * u.y * c - u.z * sin_t,
                    u.x * u.z * c + u.y * sin_t,
                    0.0,
                ],
                [
                    u.y * u.x * c + u.z * sin_t,
                    cos_t + u.y * u.y * c,
                    u.y * u.z * c - u.x * sin_t,
                    0.0,
                ],
                [
                    u.z * u.x * c - u.y * sin_t,
                    u.z * u.y * c + u.x * sin_t,
                    cos_t + u.z * u.z * c,
                    0.0,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Apply `self` first and `other` afterwards (`other * self`).
    pub fn then(&self, other: &Mat4) -> Mat4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| other.rows[i][k] * self.rows[k][j]).sum();
            }
        }
        Mat4 { rows }
    }

    pub fn apply(&self, point: Point) -> Point {
        let v = [point.x, point.y, point.z, 1.0];
        let row = |i: usize| -> f64 { (0..4).map(|k| self.rows[i][k] * v[k]).sum() };
        let w = row(3);
        Point::new(row(0) / w, row(1) / w, row(2) / w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_scale_then_translate() {
        let m = Mat4::scale(2.0).then(&Mat4::translate(Vec3::new(1.0, 0.0, -1.0)));
        assert_eq!(m.apply(Point::new(1.0, 1.0, 1.0)), Point::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_quarter_turn_around_z() {
        let m = Mat4::rotate(Vector::Z, FRAC_PI_2);
        let p = m.apply(Point::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_keeps_distance_from_axis() {
        let axis = Vector::new(1.0, 1.0, 0.0).unwrap();
        let m = Mat4::rotate(axis, 1.234);
        let p = Point::new(0.5, -2.0, 3.0);
        assert_abs_diff_eq!(m.apply(p).distance(Point::ORIGIN), p.distance(Point::ORIGIN), epsilon = 1e-12);
    }
}
