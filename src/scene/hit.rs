//! Geometric queries for selection and resize handles.

use super::{Annotation, AnnotationId, Scene};
use crate::draw::shape::ARROW_HEAD_ANGLE;
use crate::draw::{ResizeHandle, Shape};
use crate::util::{self, Point};

/// Extra distance (image pixels) accepted around thin strokes.
pub const STROKE_HIT_SLACK: f64 = 4.0;

/// Handle grab radius in screen pixels; convert with the view scale before use.
pub const HANDLE_TOLERANCE_PX: f64 = 8.0;

/// Returns the topmost annotation under `point`, if any.
pub fn hit_test(scene: &Scene, point: Point) -> Option<AnnotationId> {
    hit_test_with_slack(scene, point, STROKE_HIT_SLACK)
}

/// [`hit_test`] with a custom stroke slack, e.g. scaled for the current zoom.
pub fn hit_test_with_slack(scene: &Scene, point: Point, slack: f64) -> Option<AnnotationId> {
    scene
        .annotations()
        .iter()
        .rev()
        .find(|annotation| shape_contains(&annotation.shape, point, slack))
        .map(|annotation| annotation.id)
}

/// Exact containment test for one shape, after a bounding-box prefilter.
pub fn shape_contains(shape: &Shape, point: Point, slack: f64) -> bool {
    if !shape.bounding_box().inflate(slack).contains(point) {
        return false;
    }

    match shape {
        Shape::Pen { points, width, .. } | Shape::Highlighter { points, width, .. } => {
            util::distance_to_polyline(point, points) <= width / 2.0 + slack
        }
        Shape::Line {
            start,
            end,
            width,
            arrow_head,
            head_size,
            ..
        } => {
            let reach = width / 2.0 + slack;
            if util::distance_to_segment(point, *start, *end) <= reach {
                return true;
            }
            if *arrow_head {
                let barbs = util::calculate_arrowhead(*end, *start, *head_size, ARROW_HEAD_ANGLE);
                return barbs
                    .iter()
                    .any(|barb| util::distance_to_segment(point, *end, *barb) <= reach);
            }
            false
        }
        Shape::Rectangle { stroke_width, .. } => shape
            .frame()
            .inflate(stroke_width / 2.0)
            .contains(point),
        Shape::Ellipse {
            bounds,
            stroke_width,
            ..
        } => {
            let rx = bounds.width / 2.0 + stroke_width / 2.0;
            let ry = bounds.height / 2.0 + stroke_width / 2.0;
            if rx <= 0.0 || ry <= 0.0 {
                return false;
            }
            let center = bounds.center();
            let nx = (point.x - center.x) / rx;
            let ny = (point.y - center.y) / ry;
            nx * nx + ny * ny <= 1.0
        }
        Shape::Censor { bounds, .. } => bounds.contains(point),
        Shape::NumberMarker { center, radius, .. } => center.distance_to(point) <= *radius,
        Shape::Text { .. } => shape.frame().contains(point),
    }
}

/// Returns the resize handle of `annotation` within `tolerance` of `point`.
///
/// Line endpoints are checked before corners; `tolerance` is in image space.
pub fn handle_test(annotation: &Annotation, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    annotation
        .shape
        .handles()
        .into_iter()
        .find(|(_, position)| position.distance_to(point) <= tolerance)
        .map(|(handle, _)| handle)
}
