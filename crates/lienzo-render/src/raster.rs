//! PNG and JPEG export by rasterizing the SVG serialization.

use crate::svg::export_svg;
use crate::{ExportError, ExportResult};
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use kurbo::Size;
use lienzo_core::Document;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

/// Render the document into a pixmap the size of the canvas.
///
/// `backdrop` is painted first; pass `None` to keep transparent areas transparent.
fn rasterize(document: &Document, canvas: Size, backdrop: Option<Color>) -> ExportResult<Pixmap> {
    let svg = export_svg(document, canvas);

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = Tree::from_str(&svg, &options)?;

    let width = canvas.width.round().max(1.0) as u32;
    let height = canvas.height.round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    if let Some(color) = backdrop {
        pixmap.fill(color);
    }
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    log::debug!("Rasterized {width}x{height}");
    Ok(pixmap)
}

/// Straight (non-premultiplied) RGBA bytes.
fn rgba_pixels(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Export the document as a PNG. A transparent background stays transparent.
pub fn export_png(document: &Document, canvas: Size) -> ExportResult<Vec<u8>> {
    let pixmap = rasterize(document, canvas, None)?;
    encode_png(&rgba_pixels(&pixmap), pixmap.width(), pixmap.height())
}

/// Encode RGBA pixel data to PNG bytes.
fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> ExportResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().inspect_err(|e| {
            log::error!("Failed to write PNG header: {e:?}");
        })?;
        writer.write_image_data(rgba_data).inspect_err(|e| {
            log::error!("Failed to write PNG data: {e:?}");
        })?;
    }
    Ok(png_data)
}

/// Export the document as a JPEG. `quality` is a 0..=1 fraction; transparency becomes white.
pub fn export_jpeg(document: &Document, canvas: Size, quality: f32) -> ExportResult<Vec<u8>> {
    let pixmap = rasterize(document, canvas, Some(Color::WHITE))?;
    let rgb: Vec<u8> = rgba_pixels(&pixmap)
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut jpeg_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, jpeg_quality(quality));
    encoder
        .write_image(
            &rgb,
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .inspect_err(|e| log::error!("Failed to encode JPEG: {e}"))?;
    Ok(jpeg_data)
}

/// Map a 0..=1 quality fraction onto the encoder's 1..=100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 80;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
