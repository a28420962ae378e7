//! SVG serialization of a document.

use kurbo::Size;
use lienzo_core::Document;
use lienzo_core::shapes::{SerializableColor, Shape, ShapeStyle};
use std::fmt::Write;

/// Serialize the visible content of a document as a standalone SVG file.
///
/// Grid lines and hidden objects are left out. The background, when set, becomes a
/// full-canvas rectangle behind everything else.
pub fn export_svg(document: &Document, canvas: Size) -> String {
    let mut out = String::new();
    let (w, h) = (canvas.width, canvas.height);
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if let Some(background) = document.background() {
        let _ = writeln!(
            out,
            r#"  <rect width="{w}" height="{h}"{}/>"#,
            paint_attr("fill", Some(background))
        );
    }
    for shape in document.objects() {
        write_shape(&mut out, shape, 1);
    }
    out.push_str("</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape, depth: usize) {
    if !shape.is_visible() {
        return;
    }
    let indent = "  ".repeat(depth);
    let id = escape(shape.id().as_str());

    match shape {
        Shape::Rectangle(rect) => {
            let _ = writeln!(
                out,
                r#"{indent}<rect id="{id}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                rect.position.x,
                rect.position.y,
                rect.width,
                rect.height,
                style_attrs(&rect.style)
            );
        }
        Shape::Ellipse(ellipse) if ellipse.is_circle() => {
            let _ = writeln!(
                out,
                r#"{indent}<circle id="{id}" cx="{}" cy="{}" r="{}"{}/>"#,
                ellipse.center.x,
                ellipse.center.y,
                ellipse.radius_x,
                style_attrs(&ellipse.style)
            );
        }
        Shape::Ellipse(ellipse) => {
            let _ = writeln!(
                out,
                r#"{indent}<ellipse id="{id}" cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
                ellipse.center.x,
                ellipse.center.y,
                ellipse.radius_x,
                ellipse.radius_y,
                style_attrs(&ellipse.style)
            );
        }
        Shape::Line(line) => {
            let _ = writeln!(
                out,
                r#"{indent}<line id="{id}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                line.start.x,
                line.start.y,
                line.end.x,
                line.end.y,
                style_attrs(&line.style)
            );
        }
        Shape::Freehand(path) => {
            let _ = writeln!(
                out,
                r#"{indent}<path id="{id}" d="{}" stroke-linecap="round" stroke-linejoin="round"{}/>"#,
                shape.to_path().to_svg(),
                style_attrs(&path.style)
            );
        }
        Shape::Text(text) => {
            let family = escape(&text.font_family);
            let _ = write!(
                out,
                r#"{indent}<text id="{id}" x="{}" y="{}" font-family="{family}" font-size="{}"{}>"#,
                text.position.x,
                text.position.y + text.font_size,
                text.font_size,
                style_attrs(&text.style)
            );
            for (i, line) in text.content.lines().enumerate() {
                let dy = if i == 0 { "0" } else { "1.2em" };
                let _ = write!(
                    out,
                    r#"<tspan x="{}" dy="{dy}">{}</tspan>"#,
                    text.position.x,
                    escape(line)
                );
            }
            out.push_str("</text>\n");
        }
        Shape::Image(image) => {
            let opacity = opacity_attr(image.style.opacity);
            let _ = writeln!(
                out,
                r#"{indent}<image id="{id}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}"{opacity}/>"#,
                image.position.x,
                image.position.y,
                image.width,
                image.height,
                image.data_url()
            );
        }
        Shape::Group(group) => {
            let opacity = opacity_attr(group.style.opacity);
            let _ = writeln!(out, r#"{indent}<g id="{id}"{opacity}>"#);
            for child in group.children() {
                write_shape(out, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}</g>");
        }
    }
}

fn style_attrs(style: &ShapeStyle) -> String {
    let mut attrs = paint_attr("fill", style.fill);
    attrs.push_str(&paint_attr("stroke", Some(style.stroke)));
    if style.stroke.a > 0 {
        let _ = write!(attrs, r#" stroke-width="{}""#, style.stroke_width);
    }
    attrs.push_str(&opacity_attr(style.opacity));
    attrs
}

fn opacity_attr(opacity: f64) -> String {
    if opacity < 1.0 {
        format!(r#" opacity="{opacity}""#)
    } else {
        String::new()
    }
}

/// `fill`/`stroke` attribute with a separate opacity for translucent colors.
fn paint_attr(name: &str, color: Option<SerializableColor>) -> String {
    match color {
        Some(color) if color.a > 0 => {
            let opaque = SerializableColor { a: 255, ..color };
            let mut attr = format!(r#" {name}="{}""#, opaque.to_hex());
            if color.a < 255 {
                let _ = write!(attr, r#" {name}-opacity="{:.3}""#, color.alpha());
            }
            attr
        }
        _ => format!(r#" {name}="none""#),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
