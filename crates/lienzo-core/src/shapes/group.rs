//! Group shape containing other shapes.

use super::{ObjectMeta, Shape, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A group of shapes that behave as one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Child shapes, back to front.
    pub children: Vec<Shape>,
    /// Group-level style; only opacity is applied on export.
    pub style: ShapeStyle,
}

impl Group {
    /// Create a new group from shapes.
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            meta: ObjectMeta::unassigned(),
            children,
            style: ShapeStyle::default(),
        }
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    /// Ungroup, returning the child shapes.
    pub fn ungroup(self) -> Vec<Shape> {
        self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaf shapes, counting through nested groups.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.as_group().map_or(1, Group::leaf_count))
            .sum()
    }
}

impl ShapeTrait for Group {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn bounds(&self) -> Rect {
        let mut children = self.children.iter();
        let Some(first) = children.next() else {
            return Rect::ZERO;
        };
        children.fold(first.bounds(), |acc, child| acc.union(child.bounds()))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.children
            .iter()
            .any(|child| child.hit_test(point, tolerance))
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            path.extend(child.to_path());
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
        for child in &mut self.children {
            child.transform(affine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;

    fn two_rects() -> Group {
        let rect1 = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        let rect2 = Rectangle::new(Point::new(200.0, 200.0), 50.0, 100.0);
        Group::new(vec![Shape::Rectangle(rect1), Shape::Rectangle(rect2)])
    }

    #[test]
    fn test_group_bounds() {
        let bounds = two_rects().bounds();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 250.0, 300.0));
    }

    #[test]
    fn test_group_hit_test() {
        let group = two_rects();
        assert!(group.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(group.hit_test(Point::new(225.0, 250.0), 0.0));
        // Empty space between children
        assert!(!group.hit_test(Point::new(150.0, 100.0), 0.0));
    }

    #[test]
    fn test_nested_groups() {
        let inner = two_rects();
        let outer = Group::new(vec![
            Shape::Group(inner),
            Shape::Rectangle(Rectangle::new(Point::new(400.0, 0.0), 10.0, 10.0)),
        ]);
        assert_eq!(outer.leaf_count(), 3);
        assert!(outer.hit_test(Point::new(50.0, 25.0), 0.0));
    }

    #[test]
    fn test_transform_moves_children() {
        let mut group = two_rects();
        group.transform(Affine::translate((10.0, 10.0)));
        assert_eq!(group.bounds().origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_ungroup() {
        assert_eq!(two_rects().ungroup().len(), 2);
    }
}
