//! The sketch surface: a fixed-size raster that freehand strokes are painted into.
//!
//! Strokes go straight into the bitmap (there is no shape list to replay), so the
//! bitmap is the only state that outlives a gesture. Antialiasing is disabled so
//! every pixel is either background white or ink black.

use std::io::Read;

use cairo::{Antialias, Context, Format, ImageSurface, LineCap, LineJoin, Operator};
use log::{debug, warn};
use thiserror::Error;

use super::color::{BLACK, WHITE};
use crate::util::{Point, Rect};

/// Smallest and largest accepted brush widths, in canvas pixels.
pub const MIN_STROKE_WIDTH: f64 = 2.0;
pub const MAX_STROKE_WIDTH: f64 = 30.0;

/// Errors raised while creating, encoding, or reading the canvas bitmap.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG I/O failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Canvas pixels are not accessible: {0}")]
    Borrow(#[from] cairo::BorrowError),
}

/// Owns the canvas bitmap and the in-progress stroke.
pub struct SketchSurface {
    surface: ImageSurface,
    width: i32,
    height: i32,
    stroke_width: f64,
    /// Last point of the active stroke; `None` when not drawing.
    last_point: Option<Point>,
    blank: bool,
}

impl SketchSurface {
    /// Creates a blank (white) canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32, stroke_width: f64) -> Result<Self, SketchError> {
        let width = width.min(i32::MAX as u32) as i32;
        let height = height.min(i32::MAX as u32) as i32;
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        let mut sketch = Self {
            surface,
            width,
            height,
            stroke_width: stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            last_point: None,
            blank: true,
        };
        sketch.fill_background()?;
        Ok(sketch)
    }

    /// Creates a canvas from a PNG image, scaling it to `width` x `height`.
    ///
    /// Transparent areas of the source end up white, matching what a user would see.
    pub fn from_png<R: Read>(
        reader: &mut R,
        width: u32,
        height: u32,
        stroke_width: f64,
    ) -> Result<Self, SketchError> {
        let source = ImageSurface::create_from_png(reader)?;
        let mut sketch = Self::new(width, height, stroke_width)?;

        let (src_w, src_h) = (source.width(), source.height());
        if src_w > 0 && src_h > 0 {
            let ctx = Context::new(&sketch.surface)?;
            ctx.scale(
                sketch.width as f64 / src_w as f64,
                sketch.height as f64 / src_h as f64,
            );
            ctx.set_source_surface(&source, 0.0, 0.0)?;
            ctx.paint()?;
            sketch.blank = false;
            debug!(
                "Loaded {}x{} PNG into {}x{} canvas",
                src_w, src_h, sketch.width, sketch.height
            );
        }

        Ok(sketch)
    }

    /// Backing-store width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Backing-store height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// Sets the brush width, clamped to the supported range. Returns the applied width.
    pub fn set_stroke_width(&mut self, width: f64) -> f64 {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        self.stroke_width
    }

    /// True between `begin` and `end`/`clear`.
    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    /// True when nothing has been drawn since creation or the last clear.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Starts a new stroke at `point` (canvas coordinates) and stamps a round dot there.
    ///
    /// Returns the canvas-space rectangle that changed.
    pub fn begin(&mut self, point: Point) -> Option<Rect> {
        self.last_point = Some(point);
        self.stroke_segment(point, point)
    }

    /// Draws a segment from the last recorded point to `point`.
    ///
    /// No-op (and `None`) when no stroke is active.
    pub fn extend(&mut self, point: Point) -> Option<Rect> {
        let from = self.last_point?;
        self.last_point = Some(point);
        self.stroke_segment(from, point)
    }

    /// Stops the active stroke. Later `extend` calls are ignored until `begin`.
    pub fn end(&mut self) {
        self.last_point = None;
    }

    /// Resets the bitmap to the background color and cancels any stroke.
    pub fn clear(&mut self) {
        self.last_point = None;
        if let Err(err) = self.fill_background() {
            warn!("Failed to clear canvas: {}", err);
        }
    }

    /// The underlying Cairo surface, for compositing into the window.
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Encodes the bitmap as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, SketchError> {
        self.surface.flush();
        let mut buffer = Vec::new();
        self.surface.write_to_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads every pixel as a Cairo ARGB32 value, row-major.
    pub fn pixels(&mut self) -> Result<Vec<u32>, SketchError> {
        self.surface.flush();
        let stride = self.surface.stride() as usize;
        let (width, height) = (self.width as usize, self.height as usize);
        let data = self.surface.data()?;

        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = row * stride;
            for col in 0..width {
                let i = start + col * 4;
                pixels.push(u32::from_ne_bytes([
                    data[i],
                    data[i + 1],
                    data[i + 2],
                    data[i + 3],
                ]));
            }
        }
        Ok(pixels)
    }

    fn stroke_segment(&mut self, from: Point, to: Point) -> Option<Rect> {
        let width = self.stroke_width;
        let result = self.with_context(|ctx| {
            BLACK.apply(ctx);
            ctx.set_line_width(width);
            ctx.set_line_cap(LineCap::Round);
            ctx.set_line_join(LineJoin::Round);
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke()
        });

        match result {
            Ok(()) => {
                self.blank = false;
                Rect::around_points(from, to, width / 2.0 + 1.0)
                    .and_then(|rect| rect.clamp_to_bounds(self.width, self.height))
            }
            Err(err) => {
                warn!("Failed to draw stroke segment: {}", err);
                None
            }
        }
    }

    fn fill_background(&mut self) -> Result<(), SketchError> {
        self.with_context(|ctx| {
            ctx.set_operator(Operator::Source);
            WHITE.apply(ctx);
            ctx.paint()
        })?;
        self.blank = true;
        Ok(())
    }

    fn with_context<F>(&self, op: F) -> Result<(), SketchError>
    where
        F: FnOnce(&Context) -> Result<(), cairo::Error>,
    {
        let ctx = Context::new(&self.surface)?;
        ctx.set_antialias(Antialias::None);
        op(&ctx)?;
        Ok(())
    }
}
