use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the store when a shape is appended.
///
/// Ids are strictly increasing in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl ShapeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of shape kinds that can be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Triangle,
    FreeLine,
}

impl ShapeType {
    pub const ALL: [ShapeType; 4] = [
        ShapeType::Rectangle,
        ShapeType::Ellipse,
        ShapeType::Triangle,
        ShapeType::FreeLine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::Ellipse => "Ellipse",
            ShapeType::Triangle => "Triangle",
            ShapeType::FreeLine => "FreeLine",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shape type: {}", s))
    }
}

/// A 4-channel color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Argb {
    pub const BLACK: Argb = Argb::new(255, 0, 0, 0);
    pub const WHITE: Argb = Argb::new(255, 255, 255, 255);
    pub const TRANSPARENT: Argb = Argb::new(0, 0, 0, 0);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box with a top-left origin and non-negative size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Normalizes two arbitrary drag corners into a top-left box.
    ///
    /// A span wider than `i32::MAX` is clamped, so the far edge always fits
    /// in an `i32`.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: clamped_span(a.x, b.x),
            height: clamped_span(a.y, b.y),
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

fn clamped_span(a: i32, b: i32) -> i32 {
    i32::try_from(a.abs_diff(b)).unwrap_or(i32::MAX)
}

/// Geometry of a completed shape, one variant per [`ShapeType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Rectangle { bounds: Bounds, filled: bool },
    Ellipse { bounds: Bounds, filled: bool },
    Triangle { points: [Point; 3], filled: bool },
    /// Always holds at least two points
    FreeLine { points: Vec<Point> },
}

impl Shape {
    pub fn rectangle_from_corners(a: Point, b: Point, filled: bool) -> Self {
        Shape::Rectangle {
            bounds: Bounds::from_corners(a, b),
            filled,
        }
    }

    pub fn ellipse_from_corners(a: Point, b: Point, filled: bool) -> Self {
        Shape::Ellipse {
            bounds: Bounds::from_corners(a, b),
            filled,
        }
    }

    pub fn triangle(points: [Point; 3], filled: bool) -> Self {
        Shape::Triangle { points, filled }
    }

    /// Returns `None` for single-point strokes, which are never persisted.
    pub fn free_line(points: Vec<Point>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Shape::FreeLine { points })
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rectangle { .. } => ShapeType::Rectangle,
            Shape::Ellipse { .. } => ShapeType::Ellipse,
            Shape::Triangle { .. } => ShapeType::Triangle,
            Shape::FreeLine { .. } => ShapeType::FreeLine,
        }
    }

    /// Free lines are never filled.
    pub fn is_filled(&self) -> bool {
        match self {
            Shape::Rectangle { filled, .. }
            | Shape::Ellipse { filled, .. }
            | Shape::Triangle { filled, .. } => *filled,
            Shape::FreeLine { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeStyle {
    pub border: Argb,
    pub fill: Argb,
}

impl ShapeStyle {
    pub fn new(border: Argb, fill: Argb) -> Self {
        Self { border, fill }
    }

    pub fn outline(border: Argb) -> Self {
        Self {
            border,
            fill: Argb::TRANSPARENT,
        }
    }
}

/// A decoded, immutable persisted shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub shape: Shape,
    pub style: ShapeStyle,
}

impl ShapeRecord {
    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }
}

/// Selects which records a restore replays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeFilter {
    #[default]
    All,
    Only(ShapeType),
}

impl ShapeFilter {
    pub fn matches(&self, shape_type: ShapeType) -> bool {
        match self {
            ShapeFilter::All => true,
            ShapeFilter::Only(t) => *t == shape_type,
        }
    }
}

impl fmt::Display for ShapeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeFilter::All => f.write_str("All"),
            ShapeFilter::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for ShapeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ShapeFilter::All);
        }
        s.parse().map(ShapeFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalize_any_corner_order() {
        let expected = Bounds { x: 1, y: 2, width: 4, height: 6 };
        assert_eq!(Bounds::from_corners(Point::new(1, 2), Point::new(5, 8)), expected);
        assert_eq!(Bounds::from_corners(Point::new(5, 8), Point::new(1, 2)), expected);
        assert_eq!(Bounds::from_corners(Point::new(5, 2), Point::new(1, 8)), expected);
        assert_eq!(expected.max(), Point::new(5, 8));
    }

    #[test]
    fn test_bounds_at_coordinate_extremes() {
        let wide = Bounds::from_corners(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        assert_eq!(wide.x, i32::MIN);
        assert_eq!(wide.width, i32::MAX);
        assert_eq!(wide.max(), Point::new(-1, 0));

        let tall = Bounds::from_corners(Point::new(0, i32::MAX), Point::new(0, -1));
        assert_eq!(tall.height, i32::MAX);
        assert_eq!(tall.y, -1);
        assert_eq!(tall.max(), Point::new(0, i32::MAX - 1));

        let past_edge = Bounds { x: i32::MAX, y: 0, width: 5, height: 5 };
        assert_eq!(past_edge.max(), Point::new(i32::MAX, 5));
    }

    #[test]
    fn test_single_point_free_line_is_rejected() {
        assert!(Shape::free_line(vec![]).is_none());
        assert!(Shape::free_line(vec![Point::new(3, 3)]).is_none());
        let line = Shape::free_line(vec![Point::new(0, 0), Point::new(1, 1)]).unwrap();
        assert_eq!(line.shape_type(), ShapeType::FreeLine);
        assert!(!line.is_filled());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<ShapeFilter>().unwrap(), ShapeFilter::All);
        assert_eq!(
            "ellipse".parse::<ShapeFilter>().unwrap(),
            ShapeFilter::Only(ShapeType::Ellipse)
        );
        assert_eq!(
            "FreeLine".parse::<ShapeFilter>().unwrap(),
            ShapeFilter::Only(ShapeType::FreeLine)
        );
        assert!("hexagon".parse::<ShapeFilter>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        assert!(ShapeFilter::All.matches(ShapeType::Triangle));
        assert!(ShapeFilter::Only(ShapeType::Rectangle).matches(ShapeType::Rectangle));
        assert!(!ShapeFilter::Only(ShapeType::Rectangle).matches(ShapeType::Ellipse));
    }
}
