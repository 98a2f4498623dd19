use super::math::Vec3;

/// Phong material. Every coefficient is per channel and conceptually in
/// [0, 1]; their sum is not checked.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Material {
    /// diffuse
    pub kd: Vec3,
    /// specular
    pub ks: Vec3,
    /// transparency
    pub kt: Vec3,
    /// reflectivity
    pub kr: Vec3,
    pub shininess: u32,
}

impl Material {
    /// A purely diffuse material with the same coefficient on every channel.
    pub fn diffuse(kd: f64) -> Material {
        Material {
            kd: Vec3::splat(kd),
            ..Default::default()
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.kt.is_zero()
    }
}
