//! Background grid and grid snapping.

use crate::shapes::{Line, ObjectMeta, SerializableColor, Shape, ShapeStyle};
use kurbo::{Point, Size};

/// Grid spacing in pixels.
pub const GRID_SIZE: f64 = 20.0;

/// Color of grid lines (`#dddddd`).
pub const GRID_COLOR: SerializableColor = SerializableColor {
    r: 0xdd,
    g: 0xdd,
    b: 0xdd,
    a: 255,
};

/// Vertical then horizontal grid lines every `grid_size` pixels, both edges included.
pub fn grid_lines(canvas: Size, grid_size: f64) -> Vec<Shape> {
    if grid_size <= 0.0 {
        return Vec::new();
    }
    let style = ShapeStyle::stroke_only(GRID_COLOR, 1);
    let line = |start: Point, end: Point| {
        let mut line = Line::new(start, end).with_style(style.clone());
        line.meta = ObjectMeta::grid();
        Shape::Line(line)
    };

    let mut lines = Vec::new();
    let mut x = 0.0;
    while x <= canvas.width {
        lines.push(line(Point::new(x, 0.0), Point::new(x, canvas.height)));
        x += grid_size;
    }
    let mut y = 0.0;
    while y <= canvas.height {
        lines.push(line(Point::new(0.0, y), Point::new(canvas.width, y)));
        y += grid_size;
    }
    lines
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(23.0, 47.0), 20.0), Point::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Point::new(31.0, 51.0), 20.0), Point::new(40.0, 60.0));
        assert_eq!(snap_to_grid(Point::new(40.0, 60.0), 20.0), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_grid_lines_cover_both_edges() {
        let lines = grid_lines(Size::new(100.0, 40.0), GRID_SIZE);
        // 6 vertical (0..=100) + 3 horizontal (0..=40)
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(Shape::is_grid));
        assert!(lines.iter().all(|l| !l.meta().selectable));
        assert_eq!(lines[0].style().stroke, GRID_COLOR);
    }

    #[test]
    fn test_zero_grid_size() {
        assert!(grid_lines(Size::new(100.0, 100.0), 0.0).is_empty());
        assert_eq!(snap_to_grid(Point::new(3.0, 4.0), 0.0), Point::new(3.0, 4.0));
    }
}
