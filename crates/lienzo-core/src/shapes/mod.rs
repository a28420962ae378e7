//! Drawable objects of a Lienzo document.

mod ellipse;
mod freehand;
mod group;
mod image;
mod line;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use group::Group;
pub use image::{Image, ImageFormat};
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
    /// or a handful of named colors. Returns `None` for `none` and unknown input.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() != 3 && parts.len() != 4 {
                return None;
            }
            let r = parts[0].parse::<u8>().ok()?;
            let g = parts[1].parse::<u8>().ok()?;
            let b = parts[2].parse::<u8>().ok()?;
            let a = match parts.get(3) {
                Some(alpha) => (alpha.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
                None => 255,
            };
            return Some(Self::new(r, g, b, a));
        }

        match lower.as_str() {
            "black" => Some(Self::black()),
            "white" => Some(Self::white()),
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            "gray" | "grey" => Some(Self::rgb(128, 128, 128)),
            "transparent" => Some(Self::transparent()),
            _ => None,
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            8 => Some(Self::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
                channel(hex.get(6..8)?)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not fully opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Alpha channel as a 0..=1 fraction.
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Marker id shared by every grid line.
pub const GRID_ID: &str = "grid";

/// Identifier of a drawable object, e.g. `Rectángulo-3`.
///
/// An empty id means the object has not been labeled by a document yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn grid() -> Self {
        Self(GRID_ID.to_string())
    }

    pub fn is_grid(&self) -> bool {
        self.0 == GRID_ID
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn default_true() -> bool {
    true
}

/// Identity and visibility shared by every drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Stable id. Assigned once by the document's labeling.
    pub(crate) id: ObjectId,
    /// Display label shown in the layer panel.
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
}

impl ObjectMeta {
    /// Metadata for an object that has not been added to a document yet.
    pub fn unassigned() -> Self {
        Self {
            id: ObjectId::default(),
            name: String::new(),
            visible: true,
            selectable: true,
        }
    }

    /// Metadata for a grid line.
    pub fn grid() -> Self {
        Self {
            id: ObjectId::grid(),
            name: GRID_ID.to_string(),
            visible: true,
            selectable: false,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub(crate) fn assign(&mut self, id: ObjectId) {
        self.name = id.to_string();
        self.id = id;
    }
}

impl Default for ObjectMeta {
    fn default() -> Self {
        Self::unassigned()
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color.
    pub stroke: SerializableColor,
    /// Stroke width in pixels.
    pub stroke_width: u32,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    pub fn new(
        fill: Option<SerializableColor>,
        stroke: SerializableColor,
        stroke_width: u32,
    ) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }

    /// Style with a stroke and no fill (lines, paths).
    pub fn stroke_only(stroke: SerializableColor, stroke_width: u32) -> Self {
        Self::new(None, stroke, stroke_width)
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Set opacity, clamped to [0, 1].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    /// Half the stroke width, used as hit-test slack.
    pub fn half_stroke(&self) -> f64 {
        f64::from(self.stroke_width) / 2.0
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(SerializableColor::rgb(0x34, 0x98, 0xdb)),
            stroke: SerializableColor::black(),
            stroke_width: 2,
            opacity: 1.0,
        }
    }
}

/// Kind of a drawable object, used for labeling and the layer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Freehand,
    Text,
    Image,
    Group,
}

impl ShapeKind {
    /// Human-readable type label used to build ids.
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectángulo",
            ShapeKind::Ellipse => "Círculo",
            ShapeKind::Line => "Línea",
            ShapeKind::Freehand => "Trazo",
            ShapeKind::Text => "Texto",
            ShapeKind::Group => "Grupo",
            ShapeKind::Image => "Objeto",
        }
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Identity and visibility.
    fn meta(&self) -> &ObjectMeta;

    fn meta_mut(&mut self) -> &mut ObjectMeta;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Freehand(Freehand),
    Text(Text),
    Image(Image),
    Group(Group),
}

impl Shape {
    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Shape::Rectangle(s) => s.meta(),
            Shape::Ellipse(s) => s.meta(),
            Shape::Line(s) => s.meta(),
            Shape::Freehand(s) => s.meta(),
            Shape::Text(s) => s.meta(),
            Shape::Image(s) => s.meta(),
            Shape::Group(s) => s.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        match self {
            Shape::Rectangle(s) => s.meta_mut(),
            Shape::Ellipse(s) => s.meta_mut(),
            Shape::Line(s) => s.meta_mut(),
            Shape::Freehand(s) => s.meta_mut(),
            Shape::Text(s) => s.meta_mut(),
            Shape::Image(s) => s.meta_mut(),
            Shape::Group(s) => s.meta_mut(),
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.meta().id
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn is_visible(&self) -> bool {
        self.meta().visible
    }

    /// Grid lines are background decoration, never user content.
    pub fn is_grid(&self) -> bool {
        self.meta().id.is_grid()
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Freehand(_) => ShapeKind::Freehand,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Image(_) => ShapeKind::Image,
            Shape::Group(_) => ShapeKind::Group,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
            Shape::Group(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Ellipse(s) => s.hit_test(point, tolerance),
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Freehand(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Image(s) => s.hit_test(point, tolerance),
            Shape::Group(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Freehand(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Image(s) => s.to_path(),
            Shape::Group(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Freehand(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Image(s) => s.style(),
            Shape::Group(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Freehand(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
            Shape::Group(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Ellipse(s) => s.transform(affine),
            Shape::Line(s) => s.transform(affine),
            Shape::Freehand(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
            Shape::Image(s) => s.transform(affine),
            Shape::Group(s) => s.transform(affine),
        }
    }

    /// Move the shape by an offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(Affine::translate((dx, dy)));
    }

    /// Top-left corner of the bounding box.
    pub fn position(&self) -> Point {
        self.bounds().origin()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }
}
