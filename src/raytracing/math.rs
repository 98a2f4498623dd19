pub mod mat4;
pub mod point;
pub mod ray;
pub mod vec3;
pub mod vector;

pub use mat4::*;
pub use point::*;
pub use ray::*;
pub use vec3::*;
pub use vector::*;

/// Values closer to zero than this are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Round floating point noise around zero to an exact zero.
#[inline(always)]
pub fn align_zero(value: f64) -> f64 {
    if value.abs() < EPSILON {
        0.0
    } else {
        value
    }
}

#[inline(always)]
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
