//! Error types shared by the tracing core.

use thiserror::Error;

/// Failures raised while building the scene or evaluating a ray.
///
/// "No intersection", "fully shadowed" and "no visible light" are not errors:
/// they are expressed as empty lists or black contributions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RayTracingError {
    /// A vector with all components equal to zero has no direction.
    #[error("cannot create the zero vector")]
    ZeroVector,

    /// Subtracting a point from itself.
    #[error("cannot build a vector between two coincident points")]
    CoincidentPoints,

    /// A solid was described with parameters it cannot be built from.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The view and up directions given to a camera are not orthogonal.
    #[error("camera view and up directions must be orthogonal")]
    NonOrthogonalCamera,

    /// Any other malformed camera description.
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// The shaded point coincides with a positional light.
    #[error("light direction is undefined at the light position")]
    UndefinedLightDirection,
}

/// Result type for tracing operations.
pub type Result<T> = std::result::Result<T, RayTracingError>;
