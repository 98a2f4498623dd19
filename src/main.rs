use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::{debug, info, LevelFilter};

use whitted_rt::raytracing::core::{RayTracer, TracerSettings, MAX_LEVEL_CEILING};
use whitted_rt::raytracing::math::{Color, Vec3};
use whitted_rt::raytracing::parser::{ImageData, SceneParser};
use whitted_rt::render::{Grid, RenderOptions, Renderer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parse a color given as `r,g,b`.
fn parse_color(value: &str) -> Result<Color, String> {
    let channels = value
        .split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| format!("'{}': {}", c, e)))
        .collect::<Result<Vec<_>, _>>()?;
    match channels[..] {
        [r, g, b] => Ok(Vec3::new(r, g, b)),
        _ => Err(format!("expected 3 comma separated channels, got '{}'", value)),
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// the input path to the scene file
    scene: String,
    /// where the rendered image is saved, the format follows the extension
    #[arg(short, long, default_value = "output.png")]
    output: String,
    /// rays per pixel, more than one jitters them inside the pixel
    #[arg(short, long, default_value_t = 1)]
    samples: u32,
    /// maximum recursion depth of reflected and refracted rays
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=MAX_LEVEL_CEILING as i64))]
    max_depth: u32,
    /// attenuation below which reflected and refracted rays are not traced
    #[arg(long, default_value_t = 0.001)]
    min_attenuation: f64,
    /// apply gamma correction to the final image
    #[arg(long, default_value = "false")]
    gamma_correction: bool,
    /// draw a grid line every N pixels
    #[arg(long)]
    grid: Option<u32>,
    /// color of the grid lines, as r,g,b in [0, 1]
    #[arg(long, default_value = "1,1,1", value_parser = parse_color)]
    grid_color: Color,
    /// abort on the first pixel that cannot be traced
    #[arg(long, default_value = "false")]
    strict: bool,
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let scene_path = Path::new(&args.scene);
    let content = fs::read_to_string(scene_path)?;
    let mut parser = SceneParser::new(&content);
    if let Some(dir) = scene_path.parent() {
        parser = parser.with_base_dir(dir);
    }
    let ImageData {
        width,
        height,
        camera,
        mut scene,
    } = match parser.parse_scene() {
        Ok(data) => data,
        Err(parser_error) => {
            parser_error.print_error_location(&content);
            return Err(Box::new(parser_error));
        }
    };
    if let Some(name) = scene_path.file_stem() {
        scene.name = name.to_string_lossy().into_owned();
    }
    info!(
        "scene '{}': {}x{}, {} objects, {} lights",
        scene.name,
        width,
        height,
        scene.geometries.len(),
        scene.lights.len()
    );
    debug!(
        "camera at {:?} looking along {:?}",
        camera.position(),
        camera.forward().xyz()
    );

    let settings = TracerSettings {
        max_level: args.max_depth,
        min_attenuation: args.min_attenuation,
    };
    let options = RenderOptions {
        samples: args.samples,
        gamma_correction: args.gamma_correction,
        grid: args.grid.map(|interval| Grid {
            interval,
            color: args.grid_color,
        }),
        strict: args.strict,
    };
    let renderer = Renderer::new(
        &camera,
        RayTracer::with_settings(&scene, settings),
        width,
        height,
        options,
    );

    let start = Instant::now();
    let pixels = renderer.render()?;
    info!("traced {} pixels in {:?}", pixels.len(), start.elapsed());

    renderer.to_image(&pixels).save(&args.output)?;
    info!("saved {}", args.output);
    Ok(())
}
