//! Cairo rendering helpers: canvas compositing, text, and panel shapes.

use super::color::Color;
use super::font::FontDescriptor;
use super::sketch::SketchSurface;
use crate::util::Rect;

/// Composites the sketch bitmap into `target` (window coordinates), scaling it
/// from backing-store size to the displayed size.
pub fn render_canvas(ctx: &cairo::Context, sketch: &SketchSurface, target: Rect) {
    if sketch.width() <= 0 || sketch.height() <= 0 {
        return;
    }

    ctx.save().ok();
    ctx.rectangle(
        target.x as f64,
        target.y as f64,
        target.width as f64,
        target.height as f64,
    );
    ctx.clip();
    ctx.translate(target.x as f64, target.y as f64);
    ctx.scale(
        target.width as f64 / sketch.width() as f64,
        target.height as f64 / sketch.height() as f64,
    );

    if let Err(e) = ctx.set_source_surface(sketch.surface(), 0.0, 0.0) {
        log::warn!("Failed to use canvas as source: {}", e);
    } else {
        let _ = ctx.paint();
    }
    ctx.restore().ok();
}

/// Renders `text` with its top-left corner at (`x`, `y`).
///
/// Returns the logical width and height of the laid-out text.
pub fn render_text(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) -> (f64, f64) {
    ctx.save().ok();
    ctx.set_antialias(cairo::Antialias::Best);

    let layout = text_layout(ctx, text, size, font);
    let (width, height) = layout_size(&layout);

    ctx.move_to(x, y);
    color.apply(ctx);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
    (width, height)
}

/// Measures `text` without drawing it.
pub fn measure_text(
    ctx: &cairo::Context,
    text: &str,
    size: f64,
    font: &FontDescriptor,
) -> (f64, f64) {
    let layout = text_layout(ctx, text, size, font);
    layout_size(&layout)
}

fn text_layout(
    ctx: &cairo::Context,
    text: &str,
    size: f64,
    font: &FontDescriptor,
) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(size));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

fn layout_size(layout: &pango::Layout) -> (f64, f64) {
    let (_ink_rect, logical_rect) = layout.extents();
    (
        logical_rect.width() as f64 / pango::SCALE as f64,
        logical_rect.height() as f64 / pango::SCALE as f64,
    )
}

/// Fills a rectangle with rounded corners.
pub fn fill_rounded_rect(ctx: &cairo::Context, rect: Rect, radius: f64, color: Color) {
    rounded_rect_path(ctx, rect, radius);
    color.apply(ctx);
    let _ = ctx.fill();
}

/// Strokes the outline of a rectangle with rounded corners.
pub fn stroke_rounded_rect(
    ctx: &cairo::Context,
    rect: Rect,
    radius: f64,
    color: Color,
    width: f64,
) {
    rounded_rect_path(ctx, rect, radius);
    color.apply(ctx);
    ctx.set_line_width(width);
    let _ = ctx.stroke();
}

fn rounded_rect_path(ctx: &cairo::Context, rect: Rect, radius: f64) {
    use std::f64::consts::{FRAC_PI_2, PI};

    let (x, y) = (rect.x as f64, rect.y as f64);
    let (w, h) = (rect.width as f64, rect.height as f64);
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);

    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    ctx.arc(x + r, y + h - r, r, FRAC_PI_2, PI);
    ctx.arc(x + r, y + r, r, PI, 3.0 * FRAC_PI_2);
    ctx.close_path();
}
