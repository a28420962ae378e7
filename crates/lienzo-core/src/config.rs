//! Editor configuration.

use crate::shapes::{SerializableColor, ShapeStyle};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A named canvas size offered as a one-click choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPreset {
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
}

impl CanvasPreset {
    const fn new(label: &'static str, width: f64, height: f64) -> Self {
        Self {
            label,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

pub const CANVAS_PRESETS: [CanvasPreset; 6] = [
    CanvasPreset::new("800×600", 800.0, 600.0),
    CanvasPreset::new("1024×768", 1024.0, 768.0),
    CanvasPreset::new("1280×720 (HD)", 1280.0, 720.0),
    CanvasPreset::new("1920×1080 (Full HD)", 1920.0, 1080.0),
    CanvasPreset::new("500×500", 500.0, 500.0),
    CanvasPreset::new("1000×1000", 1000.0, 1000.0),
];

/// Tunable editor settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Background color; `None` starts with a transparent canvas.
    pub background: Option<SerializableColor>,
    pub history_capacity: usize,
    pub grid_size: f64,
    /// Offset for duplicate and paste.
    pub duplicate_offset: f64,
    pub nudge_step: f64,
    /// Nudge distance with Shift held.
    pub nudge_step_large: f64,
    /// Quiet period after the last nudge before it is recorded in history.
    pub nudge_debounce_ms: u64,
    /// Fraction of the canvas that oversized imports are scaled to fill.
    pub import_margin: f64,
    pub min_canvas_size: f64,
    pub max_canvas_size: f64,
    pub default_fill: SerializableColor,
    pub default_stroke: SerializableColor,
    pub default_stroke_width: u32,
    pub default_opacity: f64,
    pub jpeg_quality: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            background: Some(SerializableColor::white()),
            history_capacity: 30,
            grid_size: 20.0,
            duplicate_offset: 20.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            nudge_debounce_ms: 300,
            import_margin: 0.8,
            min_canvas_size: 100.0,
            max_canvas_size: 3000.0,
            default_fill: SerializableColor::rgb(0x34, 0x98, 0xdb),
            default_stroke: SerializableColor::black(),
            default_stroke_width: 2,
            default_opacity: 1.0,
            jpeg_quality: 0.8,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn nudge_debounce(&self) -> Duration {
        Duration::from_millis(self.nudge_debounce_ms)
    }

    /// Style applied to newly drawn shapes.
    pub fn default_style(&self) -> ShapeStyle {
        ShapeStyle::new(
            Some(self.default_fill),
            self.default_stroke,
            self.default_stroke_width,
        )
        .with_opacity(self.default_opacity)
    }

    /// Whether a canvas dimension is within the allowed range.
    pub fn is_valid_canvas_dimension(&self, value: f64) -> bool {
        (self.min_canvas_size..=self.max_canvas_size).contains(&value)
    }
}
