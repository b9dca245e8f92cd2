use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::SketchResult;

/// Radius of the outer origin-marker disc.
pub const ORIGIN_OUTER_RADIUS: f64 = 4.0;
/// Radius of the inner origin-marker disc.
pub const ORIGIN_INNER_RADIUS: f64 = 2.0;

/// A retained-mode drawing target.
///
/// Draw calls accumulate; nothing is redrawn from scratch between ticks. Only `clear` removes
/// previously drawn content.
pub trait RenderSurface {
    /// Surface dimensions.
    fn size(&self) -> Canvas;

    /// Wipe all content and fill with `background`.
    fn clear(&mut self, background: Rgba8);

    /// Stroke a round-capped segment.
    fn draw_line(&mut self, from: Point, to: Point, color: Rgba8, width: f64);

    /// Fill a disc.
    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    /// Export the current content as a raster image file at `path`.
    fn export_image(&mut self, path: &Path) -> SketchResult<PathBuf>;
}

/// Draw the start-point marker (red disc with a white center) at `at`.
pub fn draw_origin_marker(surface: &mut impl RenderSurface, at: Point) {
    surface.draw_filled_circle(at, ORIGIN_OUTER_RADIUS, Rgba8::MARKER_RED);
    surface.draw_filled_circle(at, ORIGIN_INNER_RADIUS, Rgba8::WHITE);
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// `clear(background)`.
    Clear(Rgba8),
    /// `draw_line(..)`.
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width.
        width: f64,
    },
    /// `draw_filled_circle(..)`.
    Circle {
        /// Disc center.
        center: Point,
        /// Disc radius.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// `export_image(path)`.
    Export(PathBuf),
}

/// Surface that records calls instead of rasterizing. For tests and debugging.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Canvas,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Empty recording surface of the given size.
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            calls: Vec::new(),
        }
    }

    /// All calls in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Calls made after the latest `clear`.
    pub fn visible(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    /// Number of line segments currently visible.
    pub fn visible_lines(&self) -> usize {
        self.visible()
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }

    /// Total number of line calls ever made.
    pub fn total_lines(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }

    /// Forget recorded calls.
    pub fn reset_log(&mut self) {
        self.calls.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Canvas {
        self.size
    }

    fn clear(&mut self, background: Rgba8) {
        self.calls.push(DrawCall::Clear(background));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba8, width: f64) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn export_image(&mut self, path: &Path) -> SketchResult<PathBuf> {
        self.calls.push(DrawCall::Export(path.to_path_buf()));
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
