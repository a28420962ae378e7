//! Drawing tools: turning pointer drags into shapes.

use crate::shapes::{Ellipse, Freehand, Line, Rectangle, Shape, ShapeStyle};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Drags narrower or shorter than this are treated as accidental clicks.
pub const MIN_RECT_SIDE: f64 = 5.0;
pub const MIN_CIRCLE_RADIUS: f64 = 3.0;
pub const MIN_LINE_LENGTH: f64 = 5.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    Line,
    Freehand,
    Text,
}

impl ToolKind {
    /// Whether the tool creates a shape from a two-point drag.
    pub fn is_drag_tool(&self) -> bool {
        matches!(self, ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Line)
    }
}

/// Build the shape a drag from `start` to `end` would create with `tool`.
///
/// Returns `None` for non-drawing tools and for drags below the minimum size.
pub fn shape_from_drag(
    tool: ToolKind,
    start: Point,
    end: Point,
    style: &ShapeStyle,
) -> Option<Shape> {
    match tool {
        ToolKind::Rectangle => {
            let rect = Rectangle::from_corners(start, end).with_style(style.clone());
            (rect.width >= MIN_RECT_SIDE && rect.height >= MIN_RECT_SIDE)
                .then_some(Shape::Rectangle(rect))
        }
        ToolKind::Ellipse => {
            let circle = Ellipse::circle_from_drag(start, end).with_style(style.clone());
            (circle.radius_x >= MIN_CIRCLE_RADIUS).then_some(Shape::Ellipse(circle))
        }
        ToolKind::Line => {
            let line = Line::new(start, end).with_style(stroke_style(style));
            (line.length() >= MIN_LINE_LENGTH).then_some(Shape::Line(line))
        }
        ToolKind::Select | ToolKind::Freehand | ToolKind::Text => None,
    }
}

/// Build a freehand path from pencil points. Needs at least two points.
pub fn freehand_from_points(points: Vec<Point>, style: &ShapeStyle) -> Option<Shape> {
    if points.len() < 2 {
        return None;
    }
    let style = stroke_style(style);
    Some(Shape::Freehand(Freehand::from_points(points).with_style(style)))
}

/// The stroke part of a style, without fill.
fn stroke_style(style: &ShapeStyle) -> ShapeStyle {
    ShapeStyle::stroke_only(style.stroke, style.stroke_width).with_opacity(style.opacity)
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// Pointer is down.
    Active {
        start: Point,
        current: Point,
    },
}

/// Manages the current tool and an in-progress drag.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    pub state: ToolState,
    /// Accumulated points for freehand drawing.
    freehand_points: Vec<Point>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any drag.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a tool interaction. Ignored for the select tool.
    pub fn begin(&mut self, point: Point) {
        if self.current_tool == ToolKind::Select {
            return;
        }
        self.freehand_points.clear();
        if self.current_tool == ToolKind::Freehand {
            self.freehand_points.push(point);
        }
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
            if self.current_tool == ToolKind::Freehand {
                self.freehand_points.push(point);
            }
        }
    }

    /// End the current interaction and return the created shape, if any.
    pub fn end(&mut self, point: Point, style: &ShapeStyle) -> Option<Shape> {
        let ToolState::Active { start, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let points = std::mem::take(&mut self.freehand_points);
        match self.current_tool {
            ToolKind::Freehand => {
                let mut points = points;
                if points.last() != Some(&point) {
                    points.push(point);
                }
                freehand_from_points(points, style)
            }
            tool => shape_from_drag(tool, start, point, style),
        }
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.freehand_points.clear();
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_reversed_drag() {
        let shape = shape_from_drag(
            ToolKind::Rectangle,
            Point::new(100.0, 100.0),
            Point::new(40.0, 60.0),
            &ShapeStyle::default(),
        );
        let Some(Shape::Rectangle(rect)) = shape else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.position, Point::new(40.0, 60.0));
        assert!((rect.width - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tiny_drags_are_discarded() {
        let style = ShapeStyle::default();
        let o = Point::ZERO;
        assert!(shape_from_drag(ToolKind::Rectangle, o, Point::new(100.0, 4.0), &style).is_none());
        assert!(shape_from_drag(ToolKind::Ellipse, o, Point::new(5.0, 0.0), &style).is_none());
        assert!(shape_from_drag(ToolKind::Line, o, Point::new(3.0, 3.0), &style).is_none());
        assert!(shape_from_drag(ToolKind::Line, o, Point::new(3.0, 4.0), &style).is_some());
        assert!(shape_from_drag(ToolKind::Select, o, Point::new(50.0, 50.0), &style).is_none());
    }

    #[test]
    fn test_line_drops_fill() {
        let shape = shape_from_drag(
            ToolKind::Line,
            Point::ZERO,
            Point::new(50.0, 0.0),
            &ShapeStyle::default(),
        )
        .unwrap();
        assert!(shape.style().fill.is_none());
    }

    #[test]
    fn test_freehand_needs_two_points() {
        let style = ShapeStyle::default();
        assert!(freehand_from_points(vec![Point::ZERO], &style).is_none());
        assert!(freehand_from_points(vec![Point::ZERO, Point::new(1.0, 1.0)], &style).is_some());
    }

    #[test]
    fn test_manager_drag_cycle() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Ellipse);
        tools.begin(Point::new(0.0, 0.0));
        tools.update(Point::new(30.0, 0.0));
        assert!(tools.is_active());
        let shape = tools.end(Point::new(40.0, 0.0), &ShapeStyle::default());
        assert!(matches!(shape, Some(Shape::Ellipse(_))));
        assert!(!tools.is_active());
    }

    #[test]
    fn test_manager_freehand() {
        let mut tools = ToolManager::new();
        tools.set_tool(ToolKind::Freehand);
        tools.begin(Point::new(0.0, 0.0));
        tools.update(Point::new(5.0, 5.0));
        let Some(Shape::Freehand(path)) = tools.end(Point::new(10.0, 5.0), &ShapeStyle::default())
        else {
            panic!("expected freehand");
        };
        assert_eq!(path.len(), 3);
    }
}
