//! Light sources consumed by the shading code.

use super::error::{RayTracingError, Result};
use super::math::{is_zero, Color, Point, Vec3, Vector};

/// Uniform light reaching every surface, added once per primary hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Vec3::zero(),
    };

    /// `ia` scaled per channel by `ka`.
    pub fn new(ia: Color, ka: Vec3) -> Self {
        AmbientLight { intensity: ia * ka }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

/// Distance attenuation `1 / (kc + kl·d + kq·d²)` of positional lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub kc: f64,
    pub kl: f64,
    pub kq: f64,
}

impl Default for Attenuation {
    fn default() -> Self {
        Attenuation {
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }
}

impl Attenuation {
    fn factor(&self, distance: f64) -> f64 {
        self.kc + self.kl * distance + self.kq * distance * distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Parallel light coming from infinitely far away along `direction`.
    Directional { intensity: Color, direction: Vector },
    Point {
        intensity: Color,
        position: Point,
        attenuation: Attenuation,
    },
    /// Point light whose beam is concentrated along `direction`.
    Spot {
        intensity: Color,
        position: Point,
        direction: Vector,
        attenuation: Attenuation,
    },
}

impl Light {
    pub fn directional(intensity: Color, direction: Vector) -> Light {
        Light::Directional {
            intensity,
            direction: direction.normalize(),
        }
    }

    pub fn point(intensity: Color, position: Point, attenuation: Attenuation) -> Light {
        Light::Point {
            intensity,
            position,
            attenuation,
        }
    }

    pub fn spot(intensity: Color, position: Point, direction: Vector, attenuation: Attenuation) -> Light {
        Light::Spot {
            intensity,
            position,
            direction: direction.normalize(),
            attenuation,
        }
    }

    /// Light intensity reaching `point`.
    pub fn intensity_at(&self, point: Point) -> Result<Color> {
        match self {
            Light::Directional { intensity, .. } => Ok(*intensity),
            Light::Point {
                intensity,
                position,
                attenuation,
            } => Ok(*intensity / attenuation.factor(point.distance(*position))),
            Light::Spot {
                intensity,
                position,
                direction,
                attenuation,
            } => {
                let projection = direction.dot(self.direction_toward(point)?);
                if is_zero(projection) {
                    return Ok(Color::zero());
                }
                let attenuated = *intensity / attenuation.factor(point.distance(*position));
                Ok(attenuated * projection.max(0.0))
            }
        }
    }

    /// Unit direction the light travels in to reach `point`.
    ///
    /// Undefined, and reported as an error, when `point` is the light position.
    pub fn direction_toward(&self, point: Point) -> Result<Vector> {
        match self {
            Light::Directional { direction, .. } => Ok(*direction),
            Light::Point { position, .. } | Light::Spot { position, .. } => point
                .subtract(*position)
                .map(Vector::normalize)
                .map_err(|_| RayTracingError::UndefinedLightDirection),
        }
    }

    /// Distance from `point` to the light, infinite for directional lights.
    pub fn distance_to(&self, point: Point) -> f64 {
        match self {
            Light::Directional { .. } => f64::INFINITY,
            Light::Point { position, .. } | Light::Spot { position, .. } => point.distance(*position),
        }
    }
}
