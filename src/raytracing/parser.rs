use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use super::camera::{Camera, ViewPlane};
use super::core::Scene;
use super::error::RayTracingError;
use super::geometry::Geometry;
use super::light::{AmbientLight, Attenuation, Light};
use super::material::Material;
use super::math::{Color, Mat4, Point, Ray, Vec3, Vector};
use super::model::Model;
use super::solid::Solid;

pub struct SceneParser {
    content: Vec<char>,
    buffer: String,
    position: FilePosition,
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilePosition {
    pub line: u32,
    pub column: u32,
    index: usize,
}

impl FilePosition {
    fn new() -> Self {
        FilePosition {
            line: 0,
            column: 0,
            index: 0,
        }
    }

    fn on_new_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.index += 1;
    }

    fn advance(&mut self) {
        self.column += 1;
        self.index += 1;
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at {}:{}", .position.line + 1, .position.column + 1)]
pub struct ParserError {
    pub position: FilePosition,
    pub message: String,
}

impl ParserError {
    fn new(message: &str, position: FilePosition) -> ParserError {
        ParserError {
            position,
            message: message.to_string(),
        }
    }

    /// Echo the offending line of `content` with a caret under the column.
    pub fn print_error_location(&self, content: &str) {
        eprintln!("{}", self);
        if let Some(line) = content.lines().nth(self.position.line as usize) {
            eprintln!("{}", line);
            let spacing = " ".repeat(self.position.column as usize);
            eprintln!("{}^", spacing);
        }
    }
}

type ParserResult<T> = Result<T, ParserError>;

/// Everything a scene file describes.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub scene: Scene,
}

const NAMED_COLORS: [(&str, Color); 10] = [
    ("red", Vec3::new(1.0, 0.0, 0.0)),
    ("green", Vec3::new(0.0, 1.0, 0.0)),
    ("blue", Vec3::new(0.0, 0.0, 1.0)),
    ("white", Vec3::new(1.0, 1.0, 1.0)),
    ("black", Vec3::new(0.0, 0.0, 0.0)),
    ("gray", Vec3::new(0.5, 0.5, 0.5)),
    ("cyan", Vec3::new(0.0, 1.0, 1.0)),
    ("violet", Vec3::new(1.0, 0.0, 1.0)),
    ("yellow", Vec3::new(1.0, 1.0, 0.0)),
    ("orange", Vec3::new(0.98, 0.45, 0.02)),
];

impl SceneParser {
    pub fn new(content: &str) -> SceneParser {
        SceneParser {
            content: content.chars().collect(),
            position: FilePosition::new(),
            buffer: String::new(),
            base_dir: None,
        }
    }

    /// Resolve relative model paths against `dir` instead of the working
    /// directory.
    pub fn with_base_dir(self, dir: &Path) -> SceneParser {
        SceneParser {
            base_dir: Some(dir.to_path_buf()),
            ..self
        }
    }

    fn get_current_char(&self) -> Option<char> {
        self.content.get(self.position.index).copied()
    }

    fn is_empty(&mut self) -> bool {
        self.peek().is_empty()
    }

    fn advance(&mut self) {
        if let Some(current_char) = self.get_current_char() {
            if current_char == '\n' {
                self.position.on_new_line();
            } else {
                self.position.advance();
            }
        }
    }

    fn advance_until(&mut self, f: impl Fn(char) -> bool) {
        while let Some(current_char) = self.get_current_char() {
            if f(current_char) {
                break;
            }
            self.advance();
        }
    }

    fn eat_spaces(&mut self) {
        // consume blank lines, spaces and comments before the next token
        while let Some(current_char) = self.get_current_char() {
            if current_char == '#' {
                // the end of line is consumed at the end of the loop
                self.advance_until(|c| c == '\n');
            } else if !current_char.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Push the current char onto `result`, advance, and return the next
    /// char (a space at the end of the input).
    fn enqueue(&mut self, result: &mut String) -> char {
        if let Some(current_char) = self.get_current_char() {
            result.push(current_char);
            self.advance();
        }
        self.get_current_char().unwrap_or(' ')
    }

    fn pop(&mut self) -> String {
        // a peeked token is returned first
        if !self.buffer.is_empty() {
            return std::mem::take(&mut self.buffer);
        }

        self.eat_spaces();
        let mut result = String::new();
        let Some(mut current_char) = self.get_current_char() else {
            return result;
        };

        match current_char {
            ',' | '(' | ')' | ':' | '>' => {
                self.advance();
                result.push(current_char);
            }
            '"' => {
                current_char = self.enqueue(&mut result);
                // no escapes
                while current_char != '"' && self.get_current_char().is_some() {
                    current_char = self.enqueue(&mut result);
                }
                self.enqueue(&mut result);
            }
            '.' | '+' | '-' | '0'..='9' => {
                if current_char == '+' || current_char == '-' {
                    current_char = self.enqueue(&mut result);
                }
                while current_char.is_ascii_digit() {
                    current_char = self.enqueue(&mut result);
                }
                if current_char == '.' {
                    current_char = self.enqueue(&mut result);
                    while current_char.is_ascii_digit() {
                        current_char = self.enqueue(&mut result);
                    }
                }
            }
            c if c.is_alphabetic() => {
                while current_char.is_alphanumeric() || current_char == '_' {
                    current_char = self.enqueue(&mut result);
                }
            }
            // a stray symbol is a token of its own, rejected by the caller
            _ => {
                self.enqueue(&mut result);
            }
        }
        result
    }

    fn peek(&mut self) -> &str {
        if self.buffer.is_empty() {
            self.buffer = self.pop();
        }
        &self.buffer
    }

    fn error<T>(&self, message: &str) -> ParserResult<T> {
        Err(ParserError::new(message, self.position))
    }

    /// Turn a construction failure of the scene objects into a parse error
    /// at the current position.
    fn check<T>(&self, result: Result<T, RayTracingError>) -> ParserResult<T> {
        result.map_err(|err| ParserError::new(&err.to_string(), self.position))
    }

    fn parse_float(&mut self) -> ParserResult<f64> {
        let next_token = self.pop();
        match next_token.parse::<f64>() {
            Ok(num) => Ok(num),
            Err(_) => self.error(&format!("cannot interpret '{}' as a number", next_token)),
        }
    }

    fn parse_unsigned(&mut self, what: &str) -> ParserResult<u32> {
        let value = self.parse_float()?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return self.error(&format!("{} must be a non negative integer, got {}", what, value));
        }
        Ok(value as u32)
    }

    fn match_token(&mut self, expected_lexem: &str) -> ParserResult<()> {
        let next_lexem = self.pop();
        if next_lexem != expected_lexem {
            self.error(&format!(
                "expected '{}', found '{}' instead",
                expected_lexem, next_lexem
            ))
        } else {
            Ok(())
        }
    }

    /// Consume the next token only if it is `expected_lexem`.
    fn maybe_match(&mut self, expected_lexem: &str) -> bool {
        if self.peek() == expected_lexem {
            self.pop();
            return true;
        }
        false
    }

    fn parse_header(&mut self) -> ParserResult<(u32, u32)> {
        self.match_token("size")?;
        let width = self.parse_unsigned("image width")?;
        let height = self.parse_unsigned("image height")?;
        if width == 0 || height == 0 {
            return self.error("image size must be positive");
        }
        Ok((width, height))
    }

    fn parse_vec3(&mut self) -> ParserResult<Vec3> {
        self.match_token("(")?;
        let x = self.parse_float()?;
        self.match_token(",")?;
        let y = self.parse_float()?;
        self.match_token(",")?;
        let z = self.parse_float()?;
        self.match_token(")")?;
        Ok(Vec3::new(x, y, z))
    }

    fn parse_point(&mut self) -> ParserResult<Point> {
        Ok(Point::from(self.parse_vec3()?))
    }

    fn parse_vector(&mut self) -> ParserResult<Vector> {
        let value = self.parse_vec3()?;
        self.check(Vector::try_from(value))
    }

    fn parse_color(&mut self) -> ParserResult<Color> {
        let token = self.peek().to_string();
        if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == token) {
            self.pop();
            return Ok(*color);
        }
        self.parse_vec3()
    }

    /// A per channel coefficient: either one number for every channel or a
    /// `(r, g, b)` tuple.
    fn parse_coefficient(&mut self) -> ParserResult<Vec3> {
        if self.peek() == "(" {
            self.parse_vec3()
        } else {
            Ok(Vec3::splat(self.parse_float()?))
        }
    }

    /// Optional appearance clauses after a solid, in any order.
    fn parse_appearance(&mut self) -> ParserResult<(Color, Material)> {
        let mut emission = Color::zero();
        let mut material = Material::default();
        loop {
            let token = self.peek().to_string();
            match token.as_str() {
                "emission" => {
                    self.pop();
                    emission = self.parse_color()?;
                }
                "kd" | "ks" | "kt" | "kr" => {
                    self.pop();
                    let k = self.parse_coefficient()?;
                    match token.as_str() {
                        "kd" => material.kd = k,
                        "ks" => material.ks = k,
                        "kt" => material.kt = k,
                        _ => material.kr = k,
                    }
                }
                "shininess" => {
                    self.pop();
                    material.shininess = self.parse_unsigned("shininess")?;
                }
                _ => return Ok((emission, material)),
            }
        }
    }

    fn finish_geometry(&mut self, solid: Solid) -> ParserResult<Geometry> {
        let (emission, material) = self.parse_appearance()?;
        Ok(Geometry::new(solid)
            .with_emission(emission)
            .with_material(material))
    }

    fn parse_sphere(&mut self) -> ParserResult<Geometry> {
        self.match_token("sphere")?;
        let center = self.parse_point()?;
        let radius = self.parse_float()?;
        let solid = self.check(Solid::sphere(center, radius))?;
        self.finish_geometry(solid)
    }

    fn parse_plane(&mut self) -> ParserResult<Geometry> {
        self.match_token("plane")?;
        let anchor = self.parse_point()?;
        let normal = self.parse_vector()?;
        self.finish_geometry(Solid::plane(anchor, normal))
    }

    fn parse_triangle(&mut self) -> ParserResult<Geometry> {
        self.match_token("triangle")?;
        let a = self.parse_point()?;
        let b = self.parse_point()?;
        let c = self.parse_point()?;
        let solid = self.check(Solid::triangle(a, b, c))?;
        self.finish_geometry(solid)
    }

    fn parse_polygon(&mut self) -> ParserResult<Geometry> {
        self.match_token("polygon")?;
        let mut vertices = Vec::new();
        while self.peek() == "(" {
            vertices.push(self.parse_point()?);
        }
        self.match_token("end")?;
        let solid = self.check(Solid::polygon(vertices))?;
        self.finish_geometry(solid)
    }

    fn parse_axis(&mut self) -> ParserResult<Ray> {
        let origin = self.parse_point()?;
        let direction = self.parse_vector()?;
        Ok(Ray::new(origin, direction))
    }

    fn parse_tube(&mut self) -> ParserResult<Geometry> {
        self.match_token("tube")?;
        let axis = self.parse_axis()?;
        let radius = self.parse_float()?;
        let solid = self.check(Solid::tube(axis, radius))?;
        self.finish_geometry(solid)
    }

    fn parse_cylinder(&mut self) -> ParserResult<Geometry> {
        self.match_token("cylinder")?;
        let axis = self.parse_axis()?;
        let radius = self.parse_float()?;
        let height = self.parse_float()?;
        let solid = self.check(Solid::cylinder(axis, radius, height))?;
        self.finish_geometry(solid)
    }

    fn parse_string(&mut self) -> ParserResult<String> {
        let token = self.pop();
        match token
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(content) => Ok(content.to_string()),
            None => self.error(&format!("expected a quoted string, found '{}'", token)),
        }
    }

    fn parse_camera(&mut self, width: u32, height: u32) -> ParserResult<Camera> {
        self.match_token("camera")?;
        let position = if self.maybe_match("from") {
            self.parse_point()?
        } else {
            Point::ORIGIN
        };
        let target = if self.maybe_match("to") {
            Some(self.parse_point()?)
        } else {
            None
        };
        let direction = if target.is_none() && self.maybe_match("direction") {
            self.parse_vector()?
        } else {
            -Vector::Z
        };
        let up = if self.maybe_match("up") {
            self.parse_vector()?
        } else {
            Vector::Y
        };
        // default view plane keeps the pixels square
        let (vp_width, vp_height) = if self.maybe_match("viewport") {
            (self.parse_float()?, self.parse_float()?)
        } else {
            (width as f64 / height as f64, 1.0)
        };
        let distance = if self.maybe_match("distance") {
            self.parse_float()?
        } else {
            1.0
        };

        let view_plane = ViewPlane {
            width: vp_width,
            height: vp_height,
            distance,
        };
        match target {
            Some(target) => self.check(Camera::look_at(position, target, up, view_plane)),
            None => self.check(Camera::new(position, direction, up, view_plane)),
        }
    }

    fn parse_attenuation(&mut self) -> ParserResult<Attenuation> {
        if !self.maybe_match("attenuation") {
            return Ok(Attenuation::default());
        }
        let kc = self.parse_float()?;
        let kl = self.parse_float()?;
        let kq = self.parse_float()?;
        if kc < 0.0 || kl < 0.0 || kq < 0.0 || kc + kl + kq == 0.0 {
            return self.error("attenuation factors must be non negative and not all zero");
        }
        Ok(Attenuation { kc, kl, kq })
    }

    fn parse_light(&mut self) -> ParserResult<Light> {
        self.match_token("light")?;
        let kind = self.pop();
        match kind.as_str() {
            "directional" => {
                let intensity = self.parse_color()?;
                self.match_token("direction")?;
                let direction = self.parse_vector()?;
                Ok(Light::directional(intensity, direction))
            }
            "point" => {
                let intensity = self.parse_color()?;
                self.match_token("at")?;
                let position = self.parse_point()?;
                let attenuation = self.parse_attenuation()?;
                Ok(Light::point(intensity, position, attenuation))
            }
            "spot" => {
                let intensity = self.parse_color()?;
                self.match_token("at")?;
                let position = self.parse_point()?;
                self.match_token("direction")?;
                let direction = self.parse_vector()?;
                let attenuation = self.parse_attenuation()?;
                Ok(Light::spot(intensity, position, direction, attenuation))
            }
            _ => self.error(&format!("unknown light type '{}'", kind)),
        }
    }

    fn parse_ambient(&mut self) -> ParserResult<AmbientLight> {
        self.match_token("ambient")?;
        let intensity = self.parse_color()?;
        let ka = self.parse_coefficient()?;
        Ok(AmbientLight::new(intensity, ka))
    }

    fn parse_transformation(&mut self) -> ParserResult<Mat4> {
        let mut transform = Mat4::identity();
        while self.maybe_match(">") {
            let next_token = self.pop();
            let next_transform = match next_token.as_str() {
                "scale" => Mat4::scale(self.parse_float()?),
                "translate" => Mat4::translate(self.parse_vec3()?),
                "rotate" => {
                    let axis = self.parse_vector()?;
                    // degrees in the scene file
                    let angle = self.parse_float()?;
                    Mat4::rotate(axis, angle.to_radians())
                }
                _ => return self.error(&format!("unknown transformation '{}'", next_token)),
            };
            transform = transform.then(&next_transform);
        }
        Ok(transform)
    }

    fn parse_model(&mut self, scene: &mut Scene) -> ParserResult<()> {
        self.match_token("model")?;
        let path = self.parse_string()?;
        let (emission, material) = self.parse_appearance()?;
        let transform = self.parse_transformation()?;

        let path = match &self.base_dir {
            Some(dir) => dir.join(&path),
            None => PathBuf::from(&path),
        };
        let geometries = Model::load(&path, transform)
            .and_then(|model| model.into_geometries(emission, material))
            .map_err(|err| {
                ParserError::new(
                    &format!("cannot load model \"{}\": {}", path.display(), err),
                    self.position,
                )
            })?;
        debug!("model {} with {} triangles", path.display(), geometries.len());
        scene.geometries.add(geometries);
        Ok(())
    }

    /// Parse a whole scene file: the `size` header, then the camera, lights,
    /// and objects in any order.
    pub fn parse_scene(&mut self) -> ParserResult<ImageData> {
        let (width, height) = self.parse_header()?;

        let mut camera = None;
        let mut scene = Scene::new("scene");
        while !self.is_empty() {
            let next_token = self.peek().to_string();
            match next_token.as_str() {
                "camera" => {
                    if camera.is_some() {
                        return self.error("the camera is defined twice");
                    }
                    camera = Some(self.parse_camera(width, height)?);
                }
                "background" => {
                    self.pop();
                    scene.background = self.parse_color()?;
                }
                "ambient" => scene.ambient_light = self.parse_ambient()?,
                "light" => {
                    let light = self.parse_light()?;
                    scene.lights.push(light);
                }
                "model" => self.parse_model(&mut scene)?,
                _ => {
                    let geometry = match next_token.as_str() {
                        "sphere" => self.parse_sphere()?,
                        "plane" => self.parse_plane()?,
                        "triangle" => self.parse_triangle()?,
                        "polygon" => self.parse_polygon()?,
                        "tube" => self.parse_tube()?,
                        "cylinder" => self.parse_cylinder()?,
                        _ => return self.error(&format!("unexpected token '{}'", next_token)),
                    };
                    debug!("{} {:?}", next_token, geometry.solid);
                    scene.geometries.add(geometry);
                }
            }
        }

        let Some(camera) = camera else {
            return self.error("the scene has no camera");
        };
        Ok(ImageData {
            width,
            height,
            camera,
            scene,
        })
    }
}
