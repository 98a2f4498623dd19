use super::error::Result;
use super::geometry::{GeoPoint, Geometries};
use super::light::{AmbientLight, Light};
use super::math::{align_zero, Color, Ray, Vec3, Vector};

/// Everything a render pass reads. Built once, never mutated while tracing.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub background: Color,
    pub ambient_light: AmbientLight,
    pub geometries: Geometries,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Scene {
            name: name.to_string(),
            background: Color::zero(),
            ambient_light: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }
}

/// Hard limit on the recursion depth, whatever the settings ask for. Every
/// level is a stack frame chain on the rendering thread.
pub const MAX_LEVEL_CEILING: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerSettings {
    /// Recursion ceiling for reflected and refracted rays, clamped to
    /// `1..=MAX_LEVEL_CEILING`. A level of 1 evaluates local illumination only.
    pub max_level: u32,
    /// Attenuation below which a branch contributes nothing.
    pub min_attenuation: f64,
}

impl Default for TracerSettings {
    fn default() -> Self {
        TracerSettings {
            max_level: 10,
            min_attenuation: 0.001,
        }
    }
}

/// Recursive Whitted-style tracer: Phong local illumination, transparency
/// aware shadows, mirror reflection and straight-through transmission.
pub struct RayTracer<'a> {
    scene: &'a Scene,
    settings: TracerSettings,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        RayTracer::with_settings(scene, TracerSettings::default())
    }

    pub fn with_settings(scene: &'a Scene, settings: TracerSettings) -> Self {
        RayTracer {
            scene,
            settings: TracerSettings {
                max_level: settings.max_level.clamp(1, MAX_LEVEL_CEILING),
                ..settings
            },
        }
    }

    pub fn settings(&self) -> TracerSettings {
        self.settings
    }

    /// Color seen along `ray`: the background on a miss, otherwise the
    /// recursive shading of the closest hit plus the ambient light.
    pub fn trace_ray(&self, ray: &Ray) -> Result<Color> {
        match self.closest_intersection(ray) {
            None => Ok(self.scene.background),
            Some(hit) => {
                let color = self.shade(&hit, ray.direction, self.settings.max_level, Vec3::one())?;
                Ok(color + self.scene.ambient_light.intensity())
            }
        }
    }

    pub fn closest_intersection(&self, ray: &Ray) -> Option<GeoPoint<'a>> {
        ray.closest_geo_point(self.scene.geometries.intersect(ray))
    }

    fn shade(&self, hit: &GeoPoint, incoming: Vector, level: u32, k: Vec3) -> Result<Color> {
        let color = self.local_effects(hit, incoming, k)?;
        if level == 1 {
            return Ok(color);
        }
        Ok(color + self.global_effects(hit, incoming, level, k)?)
    }

    fn local_effects(&self, hit: &GeoPoint, v: Vector, k: Vec3) -> Result<Color> {
        let n = hit.geometry.normal_at(hit.point);
        let nv = align_zero(n.dot(v));
        // grazing view
        if nv == 0.0 {
            return Ok(Color::zero());
        }

        let material = &hit.geometry.material;
        let mut color = hit.geometry.emission;
        for light in &self.scene.lights {
            let l = light.direction_toward(hit.point)?;
            let nl = align_zero(n.dot(l));
            // light and viewer on opposite sides of the surface
            if nl * nv <= 0.0 {
                continue;
            }
            let ktr = self.transparency(hit, light, l, n);
            if (ktr * k).all_below(self.settings.min_attenuation) {
                continue;
            }
            let intensity = light.intensity_at(hit.point)? * ktr;
            let diffuse = material.kd * nl.abs();
            let specular = material.ks * specular_factor(l, n, v, material.shininess);
            color += intensity * (diffuse + specular);
        }
        Ok(color)
    }

    /// Per channel fraction of `light` reaching the hit point: the product of
    /// the transparency of everything between them.
    fn transparency(&self, hit: &GeoPoint, light: &Light, l: Vector, n: Vector) -> Vec3 {
        let shadow_ray = Ray::offset(hit.point, -l, n);
        let light_distance = light.distance_to(shadow_ray.origin);
        let mut ktr = Vec3::one();
        for blocker in self.scene.geometries.intersect(&shadow_ray) {
            if shadow_ray.origin.distance(blocker.point) < light_distance {
                if blocker.geometry.material.is_opaque() {
                    return Vec3::zero();
                }
                ktr *= blocker.geometry.material.kt;
                if ktr.all_below(self.settings.min_attenuation) {
                    break;
                }
            }
        }
        ktr
    }

    fn global_effects(&self, hit: &GeoPoint, v: Vector, level: u32, k: Vec3) -> Result<Color> {
        let n = hit.geometry.normal_at(hit.point);
        let material = &hit.geometry.material;
        let mut color = Color::zero();

        let kkr = material.kr * k;
        if !kkr.all_below(self.settings.min_attenuation) {
            let reflected = Ray::offset(hit.point, v.reflect(n), n);
            color += self.global_effect(&reflected, level, material.kr, kkr)?;
        }

        let kkt = material.kt * k;
        if !kkt.all_below(self.settings.min_attenuation) {
            // transmission goes straight through, no bending
            let refracted = Ray::offset(hit.point, v, n);
            color += self.global_effect(&refracted, level, material.kt, kkt)?;
        }
        Ok(color)
    }

    fn global_effect(&self, ray: &Ray, level: u32, kx: Vec3, kkx: Vec3) -> Result<Color> {
        match self.closest_intersection(ray) {
            None => Ok(self.scene.background * kx),
            Some(hit) => Ok(self.shade(&hit, ray.direction, level - 1, kkx)? * kx),
        }
    }
}

/// Phong specular term `max(0, -v·r)^shininess`, `r` being `l` mirrored
/// about `n`.
fn specular_factor(l: Vector, n: Vector, v: Vector, shininess: u32) -> f64 {
    let r = l.reflect(n);
    let vr = align_zero(v.dot(r));
    (-vr).max(0.0).powf(shininess as f64)
}
