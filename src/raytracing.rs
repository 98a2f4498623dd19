pub mod camera;
pub mod core;
pub mod error;
pub mod geometry;
pub mod light;
pub mod material;
pub mod math;
pub mod model;
pub mod parser;
pub mod solid;
