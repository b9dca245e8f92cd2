use std::path::{Path, PathBuf};

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::surface::RenderSurface;

/// Straight-alpha RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write as PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> SketchResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SketchError::render(format!(
                    "create output dir '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| SketchError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// CPU raster surface powered by `vello_cpu`.
///
/// The render context is retained across ticks: every draw call is appended to it and only
/// `clear` resets it. Rasterization happens lazily in [`CpuSurface::snapshot`].
pub struct CpuSurface {
    size: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    commands: usize,
}

impl CpuSurface {
    /// New surface cleared to `background`.
    pub fn new(size: Canvas, background: Rgba8) -> SketchResult<Self> {
        size.validate()?;
        let width: u16 = size
            .width
            .try_into()
            .map_err(|_| SketchError::render("surface width exceeds u16"))?;
        let height: u16 = size
            .height
            .try_into()
            .map_err(|_| SketchError::render("surface height exceeds u16"))?;
        let mut surface = Self {
            size,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            commands: 0,
        };
        surface.clear(background);
        Ok(surface)
    }

    /// Draw commands accumulated since the latest clear (the background fill included).
    pub fn command_count(&self) -> usize {
        self.commands
    }

    /// Rasterize everything drawn so far.
    pub fn snapshot(&mut self) -> RasterImage {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_in_place(&mut data);
        RasterImage {
            width: self.size.width,
            height: self.size.height,
            data,
        }
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }
}

impl RenderSurface for CpuSurface {
    fn size(&self) -> Canvas {
        self.size
    }

    fn clear(&mut self, background: Rgba8) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_color(background);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        self.commands = 1;
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgba8, width: f64) {
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(vello_cpu::kurbo::Point::new(from.x, from.y));
        path.line_to(vello_cpu::kurbo::Point::new(to.x, to.y));

        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        self.set_color(color);
        self.ctx.stroke_path(&path);
        self.commands += 1;
    }

    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        let circle =
            vello_cpu::kurbo::Circle::new(vello_cpu::kurbo::Point::new(center.x, center.y), radius);
        self.set_color(color);
        self.ctx.fill_path(&circle.to_path(0.1));
        self.commands += 1;
    }

    fn export_image(&mut self, path: &Path) -> SketchResult<PathBuf> {
        self.snapshot().save_png(path)?;
        tracing::info!(path = %path.display(), "exported image");
        Ok(path.to_path_buf())
    }
}

fn unpremultiply_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
