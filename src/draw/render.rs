//! Cairo-based painting of annotation shapes plus the censor pixelation pass.

use super::color::Color;
use super::font::FontDescriptor;
use super::raster::Raster;
use super::shape::{ARROW_HEAD_ANGLE, Shape};
use crate::util::{self, Point, Rect};
use std::f64::consts::PI;

/// Smallest censor block size; anything finer would leak the content.
pub const MIN_CENSOR_BLOCK: f64 = 2.0;

/// Renders a single shape to a Cairo context.
///
/// Dispatches on the shape variant. [`Shape::Censor`] paints nothing here
/// because it needs the pixels underneath; see [`pixelate_region`].
pub fn render_shape(ctx: &cairo::Context, shape: &Shape) {
    match shape {
        Shape::Pen {
            points,
            color,
            width,
        } => render_polyline(ctx, points, *color, *width),
        Shape::Highlighter {
            points,
            color,
            width,
        } => render_highlighter(ctx, points, *color, *width),
        Shape::Line {
            start,
            end,
            color,
            width,
            arrow_head,
            head_size,
        } => {
            render_line(ctx, *start, *end, *color, *width);
            if *arrow_head {
                render_arrowhead(ctx, *start, *end, *color, *width, *head_size);
            }
        }
        Shape::Rectangle {
            top_left,
            bottom_right,
            fill,
            stroke,
            stroke_width,
            corner_radius,
        } => {
            let rect = Rect::from_corners(*top_left, *bottom_right);
            render_rect(ctx, &rect, *fill, *stroke, *stroke_width, *corner_radius);
        }
        Shape::Ellipse {
            bounds,
            fill,
            stroke,
            stroke_width,
        } => render_ellipse(ctx, bounds, *fill, *stroke, *stroke_width),
        Shape::Text {
            anchor,
            content,
            font_size,
            color,
            font,
        } => render_text(ctx, *anchor, content, *font_size, *color, font),
        Shape::NumberMarker {
            center,
            index,
            color,
            radius,
        } => render_number_marker(ctx, *center, *index, *color, *radius),
        Shape::Censor { .. } => {}
    }
}

/// Render freehand stroke (polyline through points)
fn render_polyline(ctx: &cairo::Context, points: &[Point], color: Color, width: f64) {
    let Some(first) = points.first() else {
        return;
    };

    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(first.x, first.y);
    if points.len() == 1 {
        // A zero-length segment with round caps paints a dot.
        ctx.line_to(first.x, first.y);
    }
    for point in &points[1..] {
        ctx.line_to(point.x, point.y);
    }

    let _ = ctx.stroke();
}

/// Highlighter strokes multiply onto the content so text underneath stays legible.
fn render_highlighter(ctx: &cairo::Context, points: &[Point], color: Color, width: f64) {
    let Some(first) = points.first() else {
        return;
    };

    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Multiply);
    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Butt);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(first.x, first.y);
    for point in &points[1..] {
        ctx.line_to(point.x, point.y);
    }
    let _ = ctx.stroke();
    ctx.restore().ok();
}

fn render_line(ctx: &cairo::Context, start: Point, end: Point, color: Color, width: f64) {
    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);

    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    let _ = ctx.stroke();
}

/// Arrowhead barbs at `end`, pointing away from `start`.
fn render_arrowhead(
    ctx: &cairo::Context,
    start: Point,
    end: Point,
    color: Color,
    width: f64,
    head_size: f64,
) {
    let [left, right] = util::calculate_arrowhead(end, start, head_size, ARROW_HEAD_ANGLE);

    color.apply(ctx);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(left.x, left.y);
    ctx.line_to(end.x, end.y);
    ctx.line_to(right.x, right.y);
    let _ = ctx.stroke();
}

/// Appends a rectangle path, rounding corners when `radius` is positive.
fn append_rect_path(ctx: &cairo::Context, rect: &Rect, radius: f64) {
    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    if radius <= 0.0 {
        ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;
    ctx.new_sub_path();
    ctx.arc(right - radius, rect.y + radius, radius, -PI / 2.0, 0.0);
    ctx.arc(right - radius, bottom - radius, radius, 0.0, PI / 2.0);
    ctx.arc(rect.x + radius, bottom - radius, radius, PI / 2.0, PI);
    ctx.arc(rect.x + radius, rect.y + radius, radius, PI, PI * 1.5);
    ctx.close_path();
}

fn render_rect(
    ctx: &cairo::Context,
    rect: &Rect,
    fill: Option<Color>,
    stroke: Color,
    stroke_width: f64,
    corner_radius: f64,
) {
    if rect.is_empty() {
        return;
    }

    ctx.set_line_join(cairo::LineJoin::Miter);
    append_rect_path(ctx, rect, corner_radius);
    if let Some(fill) = fill {
        fill.apply(ctx);
        let _ = ctx.fill_preserve();
    }
    if stroke_width > 0.0 {
        stroke.apply(ctx);
        ctx.set_line_width(stroke_width);
        let _ = ctx.stroke();
    } else {
        ctx.new_path();
    }
}

/// Render an ellipse using Cairo's arc with scaling
fn render_ellipse(
    ctx: &cairo::Context,
    bounds: &Rect,
    fill: Option<Color>,
    stroke: Color,
    stroke_width: f64,
) {
    if bounds.is_empty() {
        return;
    }

    let center = bounds.center();
    ctx.save().ok();
    ctx.translate(center.x, center.y);
    ctx.scale(bounds.width / 2.0, bounds.height / 2.0);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    ctx.restore().ok();

    if let Some(fill) = fill {
        fill.apply(ctx);
        let _ = ctx.fill_preserve();
    }
    if stroke_width > 0.0 {
        stroke.apply(ctx);
        ctx.set_line_width(stroke_width);
        let _ = ctx.stroke();
    } else {
        ctx.new_path();
    }
}

/// Renders text with its logical box's top-left corner at `anchor`.
///
/// Text containing newline characters is laid out across multiple lines by Pango.
pub fn render_text(
    ctx: &cairo::Context,
    anchor: Point,
    text: &str,
    size: f64,
    color: Color,
    font: &FontDescriptor,
) {
    if text.is_empty() {
        return;
    }

    ctx.save().ok();
    // Gray antialiasing avoids color fringing on the exported raster.
    ctx.set_antialias(cairo::Antialias::Gray);

    let layout = font.layout(ctx, text, size);
    ctx.move_to(anchor.x, anchor.y);
    color.apply(ctx);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

/// Filled circle with the sequence number centered inside.
fn render_number_marker(ctx: &cairo::Context, center: Point, index: u32, color: Color, radius: f64) {
    if radius <= 0.0 {
        return;
    }

    ctx.save().ok();
    color.apply(ctx);
    ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    let _ = ctx.fill();

    let label_color = if color.luminance() > 0.6 {
        Color::rgb(0, 0, 0)
    } else {
        Color::rgb(255, 255, 255)
    };
    let font = FontDescriptor::default();
    let label = index.to_string();
    let layout = font.layout(ctx, &label, radius);
    let (_ink, logical) = layout.extents();
    let w = logical.width() as f64 / pango::SCALE as f64;
    let h = logical.height() as f64 / pango::SCALE as f64;
    ctx.move_to(center.x - w / 2.0, center.y - h / 2.0);
    label_color.apply(ctx);
    pangocairo::functions::show_layout(ctx, &layout);
    ctx.restore().ok();
}

/// Replaces `region` of `raster` with flat blocks of their average color.
///
/// Blocks are aligned to the region's top-left corner. `block` is clamped to
/// at least [`MIN_CENSOR_BLOCK`] pixels.
pub fn pixelate_region(raster: &mut Raster, region: &Rect, block: f64) {
    let block = block.max(MIN_CENSOR_BLOCK).round() as i32;
    let x0 = region.x.floor().max(0.0) as i32;
    let y0 = region.y.floor().max(0.0) as i32;
    let x1 = (region.x + region.width).ceil().min(raster.width() as f64) as i32;
    let y1 = (region.y + region.height).ceil().min(raster.height() as f64) as i32;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let stride = raster.width() as usize * 4;
    let data = raster.as_bytes_mut();

    let mut by = y0;
    while by < y1 {
        let bh = block.min(y1 - by);
        let mut bx = x0;
        while bx < x1 {
            let bw = block.min(x1 - bx);

            // Alpha-weighted average so transparent pixels do not darken the block.
            let mut sums = [0u64; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = y as usize * stride + x as usize * 4;
                    let a = data[i + 3] as u64;
                    sums[0] += data[i] as u64 * a;
                    sums[1] += data[i + 1] as u64 * a;
                    sums[2] += data[i + 2] as u64 * a;
                    sums[3] += a;
                }
            }
            let count = (bw * bh) as u64;
            let averaged = if sums[3] == 0 {
                [0, 0, 0, 0]
            } else {
                [
                    ((sums[0] + sums[3] / 2) / sums[3]) as u8,
                    ((sums[1] + sums[3] / 2) / sums[3]) as u8,
                    ((sums[2] + sums[3] / 2) / sums[3]) as u8,
                    ((sums[3] + count / 2) / count) as u8,
                ]
            };
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = y as usize * stride + x as usize * 4;
                    data[i..i + 4].copy_from_slice(&averaged);
                }
            }

            bx += bw;
        }
        by += bh;
    }
}
