//! Parallel image synthesis on top of the ray tracer.

use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageBuffer, Rgb, RgbImage};
use log::{debug, warn};
use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;

use crate::raytracing::camera::Camera;
use crate::raytracing::core::RayTracer;
use crate::raytracing::error::RayTracingError;
use crate::raytracing::math::{Color, Vec3};

/// Number of horizontal bands rendered in parallel.
const TOTAL_STRIPES: u32 = 32;

/// Written in place of pixels whose trace failed.
pub const FAILED_PIXEL: Color = Vec3::new(1.0, 0.0, 1.0);

#[derive(Error, Debug)]
#[error("tracing pixel ({x}, {y}) failed: {source}")]
pub struct RenderError {
    pub x: u32,
    pub y: u32,
    pub source: RayTracingError,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Pixels between two lines.
    pub interval: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Rays per pixel. One ray goes through the pixel center, more are
    /// jittered inside the pixel and averaged.
    pub samples: u32,
    pub gamma_correction: bool,
    pub grid: Option<Grid>,
    /// Stop at the first failed pixel instead of painting it with
    /// [`FAILED_PIXEL`].
    pub strict: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            samples: 1,
            gamma_correction: false,
            grid: None,
            strict: false,
        }
    }
}

impl From<Vec3> for Rgb<u8> {
    fn from(value: Vec3) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb([channel(value.x), channel(value.y), channel(value.z)])
    }
}

fn gamma_correction(value: f64) -> f64 {
    if value > 0.0 {
        value.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

pub struct Renderer<'a> {
    camera: &'a Camera,
    tracer: RayTracer<'a>,
    width: u32,
    height: u32,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(camera: &'a Camera, tracer: RayTracer<'a>, width: u32, height: u32, options: RenderOptions) -> Self {
        Renderer {
            camera,
            tracer,
            width,
            height,
            options,
        }
    }

    fn pixel_color(&self, x: u32, y: u32) -> Result<Color, RayTracingError> {
        if self.options.samples <= 1 {
            let ray = self.camera.construct_ray(self.width, self.height, x, y);
            return self.tracer.trace_ray(&ray);
        }
        let mut rng = rand::thread_rng();
        let mut color = Color::zero();
        for _ in 0..self.options.samples {
            let col = x as f64 + rng.gen_range(-0.5..0.5);
            let row = y as f64 + rng.gen_range(-0.5..0.5);
            let ray = self.camera.construct_ray_through(self.width, self.height, col, row);
            color += self.tracer.trace_ray(&ray)?;
        }
        Ok(color / self.options.samples as f64)
    }

    /// Linear colors of every pixel, row by row.
    pub fn render(&self) -> Result<Vec<Color>, RenderError> {
        let width = self.width as usize;
        if width == 0 || self.height == 0 {
            return Ok(Vec::new());
        }
        let mut pixels = vec![Color::zero(); width * self.height as usize];
        let rows_per_stripe = self.height.div_ceil(TOTAL_STRIPES).max(1) as usize;
        let stripe_size = rows_per_stripe * width;
        let failed = AtomicUsize::new(0);

        pixels
            .par_chunks_mut(stripe_size)
            .enumerate()
            .try_for_each(|(stripe_index, stripe)| {
                for (i, pixel) in stripe.iter_mut().enumerate() {
                    let index = stripe_index * stripe_size + i;
                    let x = (index % width) as u32;
                    let y = (index / width) as u32;
                    *pixel = match self.pixel_color(x, y) {
                        Ok(color) => color,
                        Err(source) if self.options.strict => return Err(RenderError { x, y, source }),
                        Err(err) => {
                            debug!("pixel ({}, {}): {}", x, y, err);
                            failed.fetch_add(1, Ordering::Relaxed);
                            FAILED_PIXEL
                        }
                    };
                }
                Ok(())
            })?;

        let failed = failed.into_inner();
        if failed > 0 {
            warn!("{} pixels could not be traced and were marked", failed);
        }
        Ok(pixels)
    }

    /// Quantize linear colors to an 8 bit image, applying gamma correction
    /// and the grid overlay when requested.
    pub fn to_image(&self, pixels: &[Color]) -> RgbImage {
        let mut buffer: RgbImage = ImageBuffer::new(self.width, self.height);
        for (x, y, pixel) in buffer.enumerate_pixels_mut() {
            if let Some(grid) = self.options.grid {
                if grid.interval > 0 && (x % grid.interval == 0 || y % grid.interval == 0) {
                    *pixel = grid.color.into();
                    continue;
                }
            }
            let mut p = pixels[(x + self.width * y) as usize];
            if self.options.gamma_correction {
                p = p.map(gamma_correction);
            }
            *pixel = p.into();
        }
        buffer
    }
}
