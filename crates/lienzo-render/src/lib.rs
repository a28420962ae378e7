//! Lienzo Render Library
//!
//! Export of Lienzo documents as SVG markup and as PNG or JPEG images.
//! Raster formats are produced by rasterizing the SVG output with resvg.

mod raster;
mod svg;

pub use raster::{export_jpeg, export_png};
pub use svg::export_svg;

use kurbo::Size;
use lienzo_core::Document;
use thiserror::Error;

/// Base name of exported files.
pub const DEFAULT_FILE_STEM: &str = "mi-diseño";

/// Default JPEG quality as a 0..=1 fraction.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.8;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid SVG tree: {0}")]
    Svg(#[from] resvg::usvg::Error),
    #[error("Cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Svg,
    Png,
    /// Quality as a 0..=1 fraction.
    Jpeg { quality: f32 },
}

impl ExportFormat {
    /// Parse a file extension (`svg`, `png`, `jpg`/`jpeg`). JPEG uses the default quality.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(ExportFormat::Svg),
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Suggested download name, e.g. `mi-diseño.png`.
    pub fn default_file_name(&self) -> String {
        format!("{DEFAULT_FILE_STEM}.{}", self.extension())
    }
}

/// Encoded export ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
}

/// Export a document in the given format.
pub fn export(
    document: &Document,
    canvas: Size,
    format: ExportFormat,
) -> ExportResult<ExportOutput> {
    let bytes = match format {
        ExportFormat::Svg => export_svg(document, canvas).into_bytes(),
        ExportFormat::Png => export_png(document, canvas)?,
        ExportFormat::Jpeg { quality } => export_jpeg(document, canvas, quality)?,
    };
    log::info!(
        "Exported {} ({} bytes)",
        format.default_file_name(),
        bytes.len()
    );
    Ok(ExportOutput {
        bytes,
        mime_type: format.mime_type(),
        file_name: format.default_file_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(
            ExportFormat::from_extension("jpeg"),
            Some(ExportFormat::Jpeg { quality: 0.8 })
        );
        assert_eq!(ExportFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(ExportFormat::Svg.default_file_name(), "mi-diseño.svg");
        assert_eq!(
            ExportFormat::Jpeg { quality: 0.5 }.default_file_name(),
            "mi-diseño.jpg"
        );
    }
}
