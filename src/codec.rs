//! Conversion between shapes and their flat persisted form.
//!
//! Colors are stored as `"A,R,G,B"`. Boxed shapes store `"x,y;w,h"` and point
//! shapes store `"x1,y1;x2,y2;...;xn,yn"`.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::shape::{Argb, Bounds, Point, Shape, ShapeId, ShapeRecord, ShapeStyle, ShapeType};

/// A shape row as persisted by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRow {
    pub id: ShapeId,
    pub shape_type: ShapeType,
    pub fill_color: String,
    pub border_color: String,
    pub is_filled: bool,
    pub extra_data: String,
}

/// A row that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShapeRow {
    pub shape_type: ShapeType,
    pub fill_color: String,
    pub border_color: String,
    pub is_filled: bool,
    pub extra_data: String,
}

impl NewShapeRow {
    pub fn with_id(self, id: ShapeId) -> ShapeRow {
        ShapeRow {
            id,
            shape_type: self.shape_type,
            fill_color: self.fill_color,
            border_color: self.border_color,
            is_filled: self.is_filled,
            extra_data: self.extra_data,
        }
    }
}

pub fn encode_color(color: Argb) -> String {
    format!("{},{},{},{}", color.a, color.r, color.g, color.b)
}

/// Parses an `"A,R,G,B"` color, substituting `default` when the string is malformed.
pub fn decode_color(encoded: &str, default: Argb) -> Argb {
    let channels: Vec<Option<u8>> = encoded
        .split(',')
        .map(|c| c.trim().parse().ok())
        .collect();
    match channels.as_slice() {
        [Some(a), Some(r), Some(g), Some(b)] => Argb::new(*a, *r, *g, *b),
        _ => {
            log::debug!("Unreadable color {:?}, using {:?}", encoded, default);
            default
        }
    }
}

pub fn encode_geometry(shape: &Shape) -> String {
    match shape {
        Shape::Rectangle { bounds, .. } | Shape::Ellipse { bounds, .. } => {
            format!("{},{};{},{}", bounds.x, bounds.y, bounds.width, bounds.height)
        }
        Shape::Triangle { points, .. } => encode_points(points),
        Shape::FreeLine { points } => encode_points(points),
    }
}

fn encode_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Decodes a geometry payload for the given shape type.
///
/// `is_filled` is ignored for free lines.
pub fn decode_geometry(
    shape_type: ShapeType,
    is_filled: bool,
    payload: &str,
) -> ParseResult<Shape> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(ParseError::Empty(shape_type));
    }
    let pairs = payload
        .split(';')
        .map(parse_pair)
        .collect::<ParseResult<Vec<_>>>()?;

    match shape_type {
        ShapeType::Rectangle | ShapeType::Ellipse => {
            let [origin, size] = pairs.as_slice() else {
                return Err(ParseError::WrongPointCount {
                    shape_type,
                    expected: "2",
                    found: pairs.len(),
                });
            };
            if size.x < 0 || size.y < 0 {
                return Err(ParseError::NegativeSize {
                    width: size.x,
                    height: size.y,
                });
            }
            if origin.x.checked_add(size.x).is_none() || origin.y.checked_add(size.y).is_none() {
                return Err(ParseError::Overflow {
                    x: origin.x,
                    y: origin.y,
                    width: size.x,
                    height: size.y,
                });
            }
            let bounds = Bounds {
                x: origin.x,
                y: origin.y,
                width: size.x,
                height: size.y,
            };
            Ok(if shape_type == ShapeType::Rectangle {
                Shape::Rectangle { bounds, filled: is_filled }
            } else {
                Shape::Ellipse { bounds, filled: is_filled }
            })
        }
        ShapeType::Triangle => {
            let points: [Point; 3] =
                pairs
                    .as_slice()
                    .try_into()
                    .map_err(|_| ParseError::WrongPointCount {
                        shape_type,
                        expected: "3",
                        found: pairs.len(),
                    })?;
            Ok(Shape::Triangle { points, filled: is_filled })
        }
        ShapeType::FreeLine => {
            let found = pairs.len();
            Shape::free_line(pairs).ok_or(ParseError::WrongPointCount {
                shape_type,
                expected: "at least 2",
                found,
            })
        }
    }
}

fn parse_pair(pair: &str) -> ParseResult<Point> {
    let Some((x, y)) = pair.split_once(',') else {
        return Err(ParseError::MalformedPoint(pair.to_owned()));
    };
    if y.contains(',') {
        return Err(ParseError::MalformedPoint(pair.to_owned()));
    }
    Ok(Point::new(parse_int(x)?, parse_int(y)?))
}

fn parse_int(value: &str) -> ParseResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(value.trim().to_owned()))
}

/// Encodes a completed shape into a row ready for [`crate::store::ShapeStore::append`].
pub fn encode(shape: &Shape, style: &ShapeStyle) -> NewShapeRow {
    NewShapeRow {
        shape_type: shape.shape_type(),
        fill_color: encode_color(style.fill),
        border_color: encode_color(style.border),
        is_filled: shape.is_filled(),
        extra_data: encode_geometry(shape),
    }
}

/// Decodes a persisted row. Unreadable colors fall back to `default_color`;
/// unreadable geometry is an error for this row only.
pub fn decode(row: &ShapeRow, default_color: Argb) -> ParseResult<ShapeRecord> {
    let shape = decode_geometry(row.shape_type, row.is_filled, &row.extra_data)?;
    Ok(ShapeRecord {
        id: row.id,
        shape,
        style: ShapeStyle {
            border: decode_color(&row.border_color, default_color),
            fill: decode_color(&row.fill_color, default_color),
        },
    })
}
