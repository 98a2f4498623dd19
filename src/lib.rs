//! Recursive Whitted-style ray tracer: scene description parsing, shading
//! with shadows, reflection and transparency, and parallel rendering.

pub mod raytracing;
pub mod render;
