//! Annotation shape definitions and their geometry.

use super::color::Color;
use super::font::{FontDescriptor, measure_text};
use crate::util::{Point, Rect};

/// Degrees between each arrowhead barb and the shaft.
pub const ARROW_HEAD_ANGLE: f64 = 30.0;

/// Represents one vector annotation drawn over the subject.
///
/// All coordinates are in image space (pixels of the subject raster). Each
/// variant stores its own style so annotations render independently of the
/// current tool settings.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Freehand stroke through the pointer samples
    Pen {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
    /// Straight line, optionally with an arrowhead at `end`
    Line {
        start: Point,
        end: Point,
        color: Color,
        width: f64,
        arrow_head: bool,
        /// Arrowhead length in pixels (capped at 30% of the line when painted)
        head_size: f64,
    },
    /// Rectangle with optional fill and rounded corners
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        fill: Option<Color>,
        stroke: Color,
        stroke_width: f64,
        corner_radius: f64,
    },
    /// Ellipse inscribed in `bounds`
    Ellipse {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Color,
        stroke_width: f64,
    },
    /// Text block whose top-left corner sits at `anchor`
    Text {
        anchor: Point,
        content: String,
        font_size: f64,
        color: Color,
        font: FontDescriptor,
    },
    /// Translucent marker stroke, multiplied onto the pixels below
    Highlighter {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
    /// Pixelated region hiding what lies beneath
    Censor {
        bounds: Rect,
        /// Pixelation block size in pixels
        strength: f64,
    },
    /// Numbered circular badge
    NumberMarker {
        center: Point,
        index: u32,
        color: Color,
        radius: f64,
    },
}

/// Draggable handle on a selected annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// First endpoint of a line or arrow
    Start,
    /// Second endpoint of a line or arrow (the arrow tip)
    End,
}

impl ResizeHandle {
    /// Handle diagonally across the bounding box, which stays fixed during a resize.
    fn opposite_corner(self, frame: &Rect) -> Point {
        let min = frame.min();
        let max = frame.max();
        match self {
            ResizeHandle::TopLeft | ResizeHandle::Start => max,
            ResizeHandle::TopRight => Point::new(min.x, max.y),
            ResizeHandle::BottomLeft => Point::new(max.x, min.y),
            ResizeHandle::BottomRight | ResizeHandle::End => min,
        }
    }
}

impl Shape {
    /// Short lowercase name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Pen { .. } => "pen",
            Shape::Line {
                arrow_head: true, ..
            } => "arrow",
            Shape::Line { .. } => "line",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Text { .. } => "text",
            Shape::Highlighter { .. } => "highlighter",
            Shape::Censor { .. } => "censor",
            Shape::NumberMarker { .. } => "number",
        }
    }

    /// Geometric extent ignoring stroke width; resize handles sit on its corners.
    pub fn frame(&self) -> Rect {
        match self {
            Shape::Pen { points, .. } | Shape::Highlighter { points, .. } => {
                Rect::bounding(points).unwrap_or_default()
            }
            Shape::Line { start, end, .. } => Rect::from_corners(*start, *end),
            Shape::Rectangle {
                top_left,
                bottom_right,
                ..
            } => Rect::from_corners(*top_left, *bottom_right),
            Shape::Ellipse { bounds, .. } | Shape::Censor { bounds, .. } => *bounds,
            Shape::Text {
                anchor,
                content,
                font_size,
                font,
                ..
            } => measure_text(content, *font_size, font, anchor.x, anchor.y),
            Shape::NumberMarker { center, radius, .. } => {
                Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
            }
        }
    }

    /// Axis-aligned box covering every painted pixel, stroke included.
    pub fn bounding_box(&self) -> Rect {
        let frame = self.frame();
        match self {
            Shape::Pen { width, .. } | Shape::Highlighter { width, .. } => {
                frame.inflate(width / 2.0)
            }
            Shape::Line {
                start,
                end,
                width,
                arrow_head,
                head_size,
                ..
            } => {
                let mut rect = frame.inflate(width / 2.0);
                if *arrow_head {
                    let barbs = crate::util::calculate_arrowhead(
                        *end,
                        *start,
                        *head_size,
                        ARROW_HEAD_ANGLE,
                    );
                    if let Some(head) = Rect::bounding(&barbs) {
                        rect = rect.union(&head.inflate(width / 2.0));
                    }
                }
                rect
            }
            Shape::Rectangle { stroke_width, .. } | Shape::Ellipse { stroke_width, .. } => {
                frame.inflate(stroke_width / 2.0)
            }
            Shape::Text { .. } | Shape::Censor { .. } | Shape::NumberMarker { .. } => frame,
        }
    }

    /// True when the shape would paint nothing meaningful and should not be kept.
    ///
    /// Text and number markers are never degenerate.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Pen { points, .. } | Shape::Highlighter { points, .. } => points.len() < 2,
            Shape::Line { start, end, .. } => start == end,
            Shape::Rectangle { .. } | Shape::Ellipse { .. } | Shape::Censor { .. } => {
                self.frame().is_empty()
            }
            Shape::Text { .. } | Shape::NumberMarker { .. } => false,
        }
    }

    /// Moves every coordinate by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Pen { points, .. } | Shape::Highlighter { points, .. } => {
                for point in points.iter_mut() {
                    *point = point.offset(dx, dy);
                }
            }
            Shape::Line { start, end, .. } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            Shape::Rectangle {
                top_left,
                bottom_right,
                ..
            } => {
                *top_left = top_left.offset(dx, dy);
                *bottom_right = bottom_right.offset(dx, dy);
            }
            Shape::Ellipse { bounds, .. } | Shape::Censor { bounds, .. } => {
                *bounds = bounds.translate(dx, dy);
            }
            Shape::Text { anchor, .. } => *anchor = anchor.offset(dx, dy),
            Shape::NumberMarker { center, .. } => *center = center.offset(dx, dy),
        }
    }

    /// Handles offered for this shape, in hit-test priority order.
    pub fn handles(&self) -> Vec<(ResizeHandle, Point)> {
        if let Shape::Line { start, end, .. } = self {
            return vec![(ResizeHandle::Start, *start), (ResizeHandle::End, *end)];
        }
        let frame = self.frame();
        let min = frame.min();
        let max = frame.max();
        vec![
            (ResizeHandle::TopLeft, min),
            (ResizeHandle::TopRight, Point::new(max.x, min.y)),
            (ResizeHandle::BottomLeft, Point::new(min.x, max.y)),
            (ResizeHandle::BottomRight, max),
        ]
    }

    /// Returns a copy with `handle` dragged to `point`; the opposite corner stays put.
    pub fn resized(&self, handle: ResizeHandle, point: Point) -> Shape {
        let mut shape = self.clone();
        let frame = self.frame();
        let target = Rect::from_corners(handle.opposite_corner(&frame), point);

        match &mut shape {
            Shape::Line { start, end, .. } => match handle {
                ResizeHandle::Start => *start = point,
                ResizeHandle::End => *end = point,
                // Corner handles are never offered for lines; treat as the nearer endpoint.
                _ => {
                    if start.distance_to(point) <= end.distance_to(point) {
                        *start = point;
                    } else {
                        *end = point;
                    }
                }
            },
            Shape::Pen { points, .. } | Shape::Highlighter { points, .. } => {
                for p in points.iter_mut() {
                    *p = remap(*p, &frame, &target);
                }
            }
            Shape::Rectangle {
                top_left,
                bottom_right,
                ..
            } => {
                *top_left = target.min();
                *bottom_right = target.max();
            }
            Shape::Ellipse { bounds, .. } | Shape::Censor { bounds, .. } => *bounds = target,
            Shape::Text {
                anchor, font_size, ..
            } => {
                if frame.height > 0.0 && target.height > 0.0 {
                    *font_size = (*font_size * target.height / frame.height).max(1.0);
                }
                *anchor = target.min();
            }
            Shape::NumberMarker { center, radius, .. } => {
                *radius = (target.width.max(target.height) / 2.0).max(4.0);
                *center = target.center();
            }
        }
        shape
    }
}

/// Maps `p` from one rectangle's coordinate frame into another's.
fn remap(p: Point, from: &Rect, to: &Rect) -> Point {
    let x = if from.width > 0.0 {
        to.x + (p.x - from.x) * to.width / from.width
    } else {
        p.x + (to.x - from.x)
    };
    let y = if from.height > 0.0 {
        to.y + (p.y - from.y) * to.height / from.height
    } else {
        p.y + (to.y - from.y)
    };
    Point::new(x, y)
}
