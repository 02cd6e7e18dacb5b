use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::render::RenderSurface;
use crate::shape::{Argb, Bounds, Point, Shape, ShapeRecord};

pub fn to_color32(color: Argb) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// A [`RenderSurface`] that turns records into egui paint primitives.
///
/// The shapes are retained so a UI can repaint them every frame with
/// [`EguiSurface::paint`]. `origin` is where canvas coordinate (0, 0) lands on
/// screen.
#[derive(Debug, Clone)]
pub struct EguiSurface {
    origin: Vec2,
    stroke_width: f32,
    shapes: Vec<egui::Shape>,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self::new(Pos2::ZERO, 2.0)
    }
}

impl EguiSurface {
    pub fn new(origin: Pos2, stroke_width: f32) -> Self {
        Self {
            origin: origin.to_vec2(),
            stroke_width,
            shapes: Vec::new(),
        }
    }

    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin.to_vec2();
    }

    pub fn shapes(&self) -> &[egui::Shape] {
        &self.shapes
    }

    pub fn paint(&self, painter: &Painter) {
        painter.extend(self.shapes.iter().cloned());
    }

    fn pos(&self, point: Point) -> Pos2 {
        Pos2::new(point.x as f32, point.y as f32) + self.origin
    }

    fn rect(&self, bounds: &Bounds) -> Rect {
        Rect::from_min_max(self.pos(bounds.min()), self.pos(bounds.max()))
    }
}

impl RenderSurface for EguiSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn render_shape(&mut self, record: &ShapeRecord) {
        let stroke = Stroke::new(self.stroke_width, to_color32(record.style.border));
        let fill = to_color32(record.style.fill);

        match &record.shape {
            Shape::Rectangle { bounds, filled } => {
                let rect = self.rect(bounds);
                if *filled {
                    self.shapes.push(egui::Shape::rect_filled(rect, 0.0, fill));
                }
                self.shapes.push(egui::Shape::rect_stroke(rect, 0.0, stroke));
            }
            Shape::Ellipse { bounds, filled } => {
                let rect = self.rect(bounds);
                let radius = rect.size() / 2.0;
                if *filled {
                    self.shapes.push(egui::Shape::ellipse_filled(rect.center(), radius, fill));
                }
                self.shapes.push(egui::Shape::ellipse_stroke(rect.center(), radius, stroke));
            }
            Shape::Triangle { points, filled } => {
                let points: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
                if *filled {
                    self.shapes.push(egui::Shape::convex_polygon(points, fill, stroke));
                } else {
                    self.shapes.push(egui::Shape::closed_line(points, stroke));
                }
            }
            Shape::FreeLine { points } => {
                let points: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
                self.shapes.push(egui::Shape::line(points, stroke));
            }
        }
    }
}
