//! Freehand path: a polyline drawn with the pencil tool or flattened from SVG path data.

use super::{ObjectMeta, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A freehand path made of connected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Points along the path.
    pub points: Vec<Point>,
    /// Whether the last point connects back to the first.
    #[serde(default)]
    pub closed: bool,
    pub style: ShapeStyle,
}

impl Freehand {
    /// Create an empty freehand path.
    pub fn new() -> Self {
        let defaults = ShapeStyle::default();
        Self {
            meta: ObjectMeta::unassigned(),
            points: Vec::new(),
            closed: false,
            style: ShapeStyle::stroke_only(defaults.stroke, defaults.stroke_width),
        }
    }

    /// Create a freehand path from points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::new()
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for Freehand {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Freehand {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let slack = tolerance + self.style.half_stroke();
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= slack,
            points => {
                if self.closed && self.style.fill.is_some() && self.to_path().contains(point) {
                    return true;
                }
                if point_to_polyline_dist(point, points) <= slack {
                    return true;
                }
                // Closing segment
                self.closed
                    && super::point_to_segment_dist(point, points[points.len() - 1], points[0])
                        <= slack
            }
        }
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }
        if self.closed {
            path.close_path();
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for point in &mut self.points {
            *point = affine * *point;
        }
    }
}
