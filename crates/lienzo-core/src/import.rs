//! Import of SVG documents and raster images.
//!
//! SVG markup is parsed with `roxmltree` into a [`Group`] of editable shapes. Raster
//! images become a single [`Image`] object. Imports larger than the canvas are scaled
//! down and every import is centered.

use crate::shapes::{
    Ellipse, Freehand, Group, Image, ImageFormat, Line, Rectangle, SerializableColor, Shape,
    ShapeStyle, Text,
};
use kurbo::{Affine, BezPath, PathEl, Point, Size};
use std::path::Path;
use thiserror::Error;

/// Tolerance used when flattening SVG curves into polylines.
const FLATTEN_TOLERANCE: f64 = 0.25;

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file: {0}")]
    Unsupported(String),
    #[error("Invalid SVG: {0}")]
    SvgParse(#[from] roxmltree::Error),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Nothing to import")]
    Empty,
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// What a file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Svg,
    Raster(ImageFormat),
}

impl ImportKind {
    pub fn is_svg(&self) -> bool {
        matches!(self, ImportKind::Svg)
    }
}

/// Classify a file from its name and content.
pub fn detect(file_name: &str, bytes: &[u8]) -> ImportResult<ImportKind> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    if extension.as_deref() == Some("svg") || looks_like_markup(bytes) {
        return Ok(ImportKind::Svg);
    }
    if let Some(format) = ImageFormat::from_magic_bytes(bytes) {
        return Ok(ImportKind::Raster(format));
    }
    Err(ImportError::Unsupported(file_name.to_string()))
}

fn looks_like_markup(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'<')
}

/// Parse a file into an unlabeled shape: a group for SVG, an image for raster data.
pub fn import_bytes(file_name: &str, bytes: &[u8]) -> ImportResult<Shape> {
    match detect(file_name, bytes)? {
        ImportKind::Svg => {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| ImportError::Unsupported(format!("{file_name} is not UTF-8")))?;
            Ok(Shape::Group(parse_svg(text)?))
        }
        ImportKind::Raster(_) => Ok(Shape::Image(decode_raster(bytes)?)),
    }
}

/// Decode raster bytes into an image object displayed at its pixel size.
pub fn decode_raster(bytes: &[u8]) -> ImportResult<Image> {
    let format = ImageFormat::from_magic_bytes(bytes)
        .ok_or_else(|| ImportError::Unsupported("unknown image format".to_string()))?;
    let decoded = image::load_from_memory(bytes)?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ImportError::Empty);
    }
    Ok(Image::new(Point::ZERO, bytes, decoded.width(), decoded.height(), format))
}

/// Scale `shape` down to `margin` of the canvas if it does not fit, then center it.
pub fn fit_to_canvas(shape: &mut Shape, canvas: Size, margin: f64) {
    let bounds = shape.bounds();
    if bounds.width() > canvas.width || bounds.height() > canvas.height {
        let scale = (canvas.width / bounds.width()).min(canvas.height / bounds.height()) * margin;
        shape.transform(Affine::scale(scale));
    }

    let bounds = shape.bounds();
    let target = Point::new(canvas.width / 2.0, canvas.height / 2.0);
    let center = bounds.center();
    shape.translate(target.x - center.x, target.y - center.y);
}

/// Parse SVG markup into a group of shapes.
pub fn parse_svg(text: &str) -> ImportResult<Group> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ImportError::Unsupported(format!(
            "root element <{}>",
            root.tag_name().name()
        )));
    }

    let paint = SvgPaint::default().inherit(root);
    let children = parse_children(root, &paint);
    if children.is_empty() {
        return Err(ImportError::Empty);
    }
    log::debug!("Parsed SVG with {} top-level elements", children.len());
    Ok(Group::new(children))
}

/// Presentation attributes inherited down the SVG tree.
#[derive(Debug, Clone, Copy)]
struct SvgPaint {
    fill: Option<SerializableColor>,
    stroke: Option<SerializableColor>,
    stroke_width: f64,
    opacity: f64,
    font_size: f64,
}

impl Default for SvgPaint {
    fn default() -> Self {
        // SVG initial values
        Self {
            fill: Some(SerializableColor::black()),
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            font_size: 16.0,
        }
    }
}

impl SvgPaint {
    /// Apply a node's presentation attributes and `style` declarations.
    fn inherit(mut self, node: roxmltree::Node) -> Self {
        let mut fill_val = node.attribute("fill");
        let mut stroke_val = node.attribute("stroke");
        let mut stroke_width_val = node.attribute("stroke-width");
        let mut opacity_val = node.attribute("opacity");
        let mut font_size_val = node.attribute("font-size");
        if let Some(style) = node.attribute("style") {
            for part in style.split(';') {
                let Some((key, value)) = part.split_once(':') else {
                    continue;
                };
                let value = value.trim();
                match key.trim() {
                    "fill" => fill_val = Some(value),
                    "stroke" => stroke_val = Some(value),
                    "stroke-width" => stroke_width_val = Some(value),
                    "opacity" => opacity_val = Some(value),
                    "font-size" => font_size_val = Some(value),
                    _ => {}
                }
            }
        }

        if let Some(fill) = fill_val {
            self.fill = paint_value(fill, self.fill);
        }
        if let Some(stroke) = stroke_val {
            self.stroke = paint_value(stroke, self.stroke);
        }
        if let Some(width) = stroke_width_val.and_then(parse_length) {
            self.stroke_width = width.max(0.0);
        }
        if let Some(opacity) = opacity_val.and_then(parse_length) {
            // Group opacity multiplies down the tree
            self.opacity *= opacity.clamp(0.0, 1.0);
        }
        if let Some(size) = font_size_val.and_then(parse_length) {
            self.font_size = size;
        }
        self
    }

    fn style(&self) -> ShapeStyle {
        let stroke_width = match self.stroke {
            Some(_) => self.stroke_width.round() as u32,
            None => 0,
        };
        ShapeStyle::new(
            self.fill,
            self.stroke.unwrap_or_else(SerializableColor::transparent),
            stroke_width,
        )
        .with_opacity(self.opacity)
    }
}

fn paint_value(value: &str, inherited: Option<SerializableColor>) -> Option<SerializableColor> {
    match value.trim() {
        "none" => None,
        "inherit" | "currentColor" => inherited,
        other => SerializableColor::parse(other).or(inherited),
    }
}

/// Parse a length, dropping a `px` unit.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
}

fn number(node: roxmltree::Node, name: &str) -> f64 {
    node.attribute(name).and_then(parse_length).unwrap_or(0.0)
}

/// Parse `translate`, `scale` and `matrix` entries of a `transform` attribute.
fn parse_transform(value: &str) -> Affine {
    let mut affine = Affine::IDENTITY;
    for item in value.split(')') {
        let Some((name, args)) = item.split_once('(') else {
            continue;
        };
        let args: Vec<f64> = args
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        let step = match (name.trim(), args.as_slice()) {
            ("translate", [tx]) => Affine::translate((*tx, 0.0)),
            ("translate", [tx, ty]) => Affine::translate((*tx, *ty)),
            ("scale", [s]) => Affine::scale(*s),
            ("scale", [sx, sy]) => Affine::scale_non_uniform(*sx, *sy),
            ("matrix", [a, b, c, d, e, f]) => Affine::new([*a, *b, *c, *d, *e, *f]),
            (other, _) => {
                log::warn!("Ignoring unsupported SVG transform `{other}`");
                Affine::IDENTITY
            }
        };
        affine *= step;
    }
    affine
}

fn parse_points(value: &str) -> Vec<Point> {
    let coords: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

fn parse_children(node: roxmltree::Node, paint: &SvgPaint) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        let paint = paint.inherit(child);
        let name = child.tag_name().name();
        let shape = match name {
            "rect" => {
                let rect = Rectangle::new(
                    Point::new(number(child, "x"), number(child, "y")),
                    number(child, "width"),
                    number(child, "height"),
                );
                Some(Shape::Rectangle(rect.with_style(paint.style())))
            }
            "circle" => {
                let center = Point::new(number(child, "cx"), number(child, "cy"));
                let circle = Ellipse::circle(center, number(child, "r"));
                Some(Shape::Ellipse(circle.with_style(paint.style())))
            }
            "ellipse" => {
                let center = Point::new(number(child, "cx"), number(child, "cy"));
                let ellipse = Ellipse::new(center, number(child, "rx"), number(child, "ry"));
                Some(Shape::Ellipse(ellipse.with_style(paint.style())))
            }
            "line" => {
                let line = Line::new(
                    Point::new(number(child, "x1"), number(child, "y1")),
                    Point::new(number(child, "x2"), number(child, "y2")),
                );
                Some(Shape::Line(line.with_style(paint.style())))
            }
            "polyline" | "polygon" => {
                let points = parse_points(child.attribute("points").unwrap_or(""));
                (points.len() >= 2).then(|| {
                    Shape::Freehand(
                        Freehand::from_points(points)
                            .closed(name == "polygon")
                            .with_style(paint.style()),
                    )
                })
            }
            "path" => parse_path(child.attribute("d").unwrap_or(""), &paint),
            "text" => parse_text(child, &paint),
            "g" | "a" | "svg" => {
                let nested = parse_children(child, &paint);
                match nested.len() {
                    0 => None,
                    1 if name != "g" => nested.into_iter().next(),
                    _ => Some(Shape::Group(Group::new(nested))),
                }
            }
            "defs" | "style" | "title" | "desc" | "metadata" => None,
            other => {
                log::debug!("Skipping unsupported SVG element <{other}>");
                None
            }
        };

        if let Some(mut shape) = shape {
            if let Some(transform) = child.attribute("transform") {
                shape.transform(parse_transform(transform));
            }
            shapes.push(shape);
        }
    }
    shapes
}

/// Flatten path data into one freehand shape per subpath.
fn parse_path(d: &str, paint: &SvgPaint) -> Option<Shape> {
    let path = match BezPath::from_svg(d) {
        Ok(path) => path,
        Err(e) => {
            log::warn!("Skipping SVG path with invalid data: {e}");
            return None;
        }
    };

    let mut subpaths: Vec<Freehand> = Vec::new();
    let mut current: Option<Freehand> = None;
    kurbo::flatten(path.elements().iter().copied(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if let Some(done) = current.take() {
                subpaths.push(done);
            }
            current = Some(Freehand::from_points(vec![p]).with_style(paint.style()));
        }
        PathEl::LineTo(p) => {
            if let Some(sub) = current.as_mut() {
                sub.add_point(p);
            }
        }
        PathEl::ClosePath => {
            if let Some(mut done) = current.take() {
                done.closed = true;
                subpaths.push(done);
            }
        }
        _ => {}
    });
    if let Some(done) = current {
        subpaths.push(done);
    }

    let mut parts: Vec<Shape> = subpaths
        .into_iter()
        .filter(|sub| sub.len() >= 2)
        .map(Shape::Freehand)
        .collect();
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Shape::Group(Group::new(parts))),
    }
}

fn parse_text(node: roxmltree::Node, paint: &SvgPaint) -> Option<Shape> {
    let content: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<Vec<_>>()
        .join("");
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    // SVG positions text at its baseline; ours is the top-left corner
    let position = Point::new(number(node, "x"), number(node, "y") - paint.font_size);
    let mut text = Text::new(position, content)
        .with_font_size(paint.font_size)
        .with_style(paint.style());
    if let Some(family) = node.attribute("font-family") {
        text = text.with_font_family(family.trim_matches(|c| c == '\'' || c == '"'));
    }
    Some(Shape::Text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
        <rect x="10" y="10" width="80" height="40" fill="#ff0000" stroke="#000" stroke-width="3"/>
        <g fill="none" stroke="blue">
            <circle cx="150" cy="50" r="20"/>
            <line x1="0" y1="90" x2="200" y2="90"/>
        </g>
        <path d="M 0 0 L 10 0 L 10 10 Z M 20 20 L 30 30"/>
        <text x="20" y="80" font-size="12">Hola</text>
    </svg>"##;

    #[test]
    fn test_parse_svg_elements() {
        let group = parse_svg(BADGE).unwrap();
        let kinds: Vec<_> = group.children().iter().map(Shape::kind).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(group.children()[0], Shape::Rectangle(_)));
        assert!(matches!(group.children()[1], Shape::Group(_)));
        assert!(matches!(group.children()[2], Shape::Group(_)));
        assert!(matches!(group.children()[3], Shape::Text(_)));
        assert_eq!(group.leaf_count(), 6);
    }

    #[test]
    fn test_parse_svg_styles() {
        let group = parse_svg(BADGE).unwrap();
        let rect = group.children()[0].style();
        assert_eq!(rect.fill, Some(SerializableColor::rgb(255, 0, 0)));
        assert_eq!(rect.stroke, SerializableColor::black());
        assert_eq!(rect.stroke_width, 3);

        let Shape::Group(inner) = &group.children()[1] else {
            panic!("expected group");
        };
        let circle = inner.children()[0].style();
        assert_eq!(circle.fill, None);
        assert_eq!(circle.stroke, SerializableColor::rgb(0, 0, 255));
    }

    #[test]
    fn test_path_subpaths_and_closing() {
        let group = parse_svg(BADGE).unwrap();
        let Shape::Group(path) = &group.children()[2] else {
            panic!("expected group");
        };
        let Shape::Freehand(first) = &path.children()[0] else {
            panic!("expected freehand");
        };
        assert!(first.closed);
        assert!(first.len() >= 3);
        assert_eq!(path.children().len(), 2);
    }

    #[test]
    fn test_transform_attribute() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
            <rect x="0" y="0" width="10" height="10" transform="translate(5, 7)"/>
        </svg>"#;
        let group = parse_svg(svg).unwrap();
        assert_eq!(group.children()[0].position(), Point::new(5.0, 7.0));
    }

    #[test]
    fn test_empty_svg_is_rejected() {
        let err = parse_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#).unwrap_err();
        assert!(matches!(err, ImportError::Empty));
        assert!(matches!(parse_svg("<svg"), Err(ImportError::SvgParse(_))));
    }

    #[test]
    fn test_detect() {
        assert_eq!(detect("logo.SVG", b"").unwrap(), ImportKind::Svg);
        assert_eq!(detect("blob", b"  <svg/>").unwrap(), ImportKind::Svg);
        assert_eq!(
            detect("photo", &[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(),
            ImportKind::Raster(ImageFormat::Jpeg)
        );
        assert!(matches!(detect("notes.txt", b"hello"), Err(ImportError::Unsupported(_))));
    }

    #[test]
    fn test_fit_scales_oversized_content() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 1600.0, 600.0));
        fit_to_canvas(&mut shape, Size::new(800.0, 600.0), 0.8);
        let bounds = shape.bounds();
        assert!((bounds.width() - 640.0).abs() < 1e-9);
        assert!((bounds.height() - 240.0).abs() < 1e-9);
        assert!((bounds.center().x - 400.0).abs() < 1e-9);
        assert!((bounds.center().y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_only_centers_small_content() {
        let mut shape = Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 50.0));
        fit_to_canvas(&mut shape, Size::new(800.0, 600.0), 0.8);
        let bounds = shape.bounds();
        assert!((bounds.width() - 100.0).abs() < 1e-9);
        assert_eq!(bounds.origin(), Point::new(350.0, 275.0));
    }
}
