//! Live canvas painting.

use crate::renderer::{
    RenderError, RenderResult, composite_items, pixmap_from_rgba, to_skia_color, validate_canvas,
};
use image::RgbaImage;
use kurbo::{Affine, Size};
use peniko::Color;
use photomark_core::canvas::Canvas;
use photomark_core::geometry::fit_rect;
use std::path::Path;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Look of the live canvas around the photo.
#[derive(Debug, Clone, Copy)]
pub struct LiveStyle {
    /// Letterbox color.
    pub background: Color,
}

impl Default for LiveStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(24, 24, 24, 255),
        }
    }
}

impl LiveStyle {
    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

/// Paints frames of the interactive canvas.
///
/// The source photo is decoded and premultiplied once, then reused for every
/// frame.
#[derive(Debug, Default)]
pub struct LiveRenderer {
    style: LiveStyle,
    source: Option<Pixmap>,
}

impl LiveRenderer {
    pub fn new(style: LiveStyle) -> Self {
        Self {
            style,
            source: None,
        }
    }

    pub fn style(&self) -> &LiveStyle {
        &self.style
    }

    /// Use an already decoded photo.
    pub fn set_source(&mut self, image: &RgbaImage) -> RenderResult<()> {
        self.source = Some(pixmap_from_rgba(image)?);
        Ok(())
    }

    /// Decode and cache the photo at `path`.
    pub fn load_source(&mut self, path: &Path) -> RenderResult<()> {
        let image = crate::bake::decode_source(path)?;
        self.set_source(&image)?;
        log::debug!(
            "Loaded live source {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(())
    }

    /// Where the photo lands on a canvas of `canvas_size`.
    pub fn image_rect(&self, canvas_size: Size) -> Option<kurbo::Rect> {
        let source = self.source.as_ref()?;
        let content = Size::new(f64::from(source.width()), f64::from(source.height()));
        Some(fit_rect(content, canvas_size))
    }

    /// Paint one frame: background, letterboxed photo, committed items, then
    /// the provisional shape. The frame is `canvas.canvas_size()` pixels.
    pub fn paint(&self, canvas: &Canvas) -> RenderResult<Pixmap> {
        let size = canvas.canvas_size();
        validate_canvas(size)?;
        let (width, height) = (size.width.round().max(1.0), size.height.round().max(1.0));
        let mut frame =
            Pixmap::new(width as u32, height as u32).ok_or(RenderError::InvalidCanvas {
                width: size.width,
                height: size.height,
            })?;
        frame.fill(to_skia_color(self.style.background));

        if let (Some(source), Some(rect)) = (&self.source, self.image_rect(size)) {
            let sx = rect.width() / f64::from(source.width());
            let sy = rect.height() / f64::from(source.height());
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            frame.draw_pixmap(
                0,
                0,
                source.as_ref(),
                &paint,
                Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, rect.x0 as f32, rect.y0 as f32),
                None,
            );
        }

        composite_items(
            &mut frame,
            canvas.items().iter().chain(canvas.provisional()),
            Affine::IDENTITY,
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use photomark_core::input::TouchEvent;
    use photomark_core::shapes::SerializableColor;
    use photomark_core::tools::ToolKind;

    fn rgb(frame: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let c = frame.pixel(x, y).unwrap();
        (c.red(), c.green(), c.blue())
    }

    fn canvas(width: f64, height: f64) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_canvas_size(width, height);
        canvas
    }

    #[test]
    fn test_paint_requires_canvas_size() {
        let renderer = LiveRenderer::default();
        assert!(matches!(
            renderer.paint(&Canvas::new()),
            Err(RenderError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_background_only() {
        let renderer =
            LiveRenderer::new(LiveStyle::default().with_background(Color::from_rgba8(1, 2, 3, 255)));
        let frame = renderer.paint(&canvas(30.0, 20.0)).unwrap();
        assert_eq!((frame.width(), frame.height()), (30, 20));
        assert_eq!(rgb(&frame, 15, 10), (1, 2, 3));
    }

    #[test]
    fn test_source_is_letterboxed() {
        let mut renderer =
            LiveRenderer::new(LiveStyle::default().with_background(Color::from_rgba8(0, 0, 0, 255)));
        renderer
            .set_source(&RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255])))
            .unwrap();

        let frame = renderer.paint(&canvas(100.0, 100.0)).unwrap();
        assert_eq!(rgb(&frame, 50, 10), (0, 0, 0));
        assert_eq!(rgb(&frame, 50, 50), (255, 0, 0));
        assert_eq!(rgb(&frame, 50, 90), (0, 0, 0));
        assert_eq!(
            renderer.image_rect(Size::new(100.0, 100.0)),
            Some(kurbo::Rect::new(0.0, 25.0, 100.0, 75.0))
        );
    }

    #[test]
    fn test_provisional_shape_is_painted() {
        let renderer = LiveRenderer::default();
        let mut canvas = canvas(100.0, 100.0);
        canvas.set_color(SerializableColor::new(0, 255, 0, 255));
        canvas.set_stroke_width(6.0);
        canvas.set_tool(ToolKind::Rectangle);
        canvas.handle_touch(TouchEvent::down(1, 20.0, 20.0));
        canvas.handle_touch(TouchEvent::moved(1, 80.0, 80.0));
        assert!(canvas.items().is_empty());

        let frame = renderer.paint(&canvas).unwrap();
        assert_eq!(rgb(&frame, 20, 50), (0, 255, 0));
        assert_ne!(rgb(&frame, 50, 50), (0, 255, 0));
    }

    #[test]
    fn test_erase_shows_photo_not_background() {
        let mut renderer = LiveRenderer::default();
        renderer
            .set_source(&RgbaImage::from_pixel(50, 50, Rgba([0, 0, 255, 255])))
            .unwrap();
        let mut canvas = canvas(50.0, 50.0);
        canvas.set_stroke_width(10.0);

        for (tool, pointer) in [(ToolKind::Stroke, 1), (ToolKind::Erase, 2)] {
            canvas.set_tool(tool);
            canvas.handle_touch(TouchEvent::down(pointer, 5.0, 25.0));
            canvas.handle_touch(TouchEvent::moved(pointer, 45.0, 25.0));
            canvas.handle_touch(TouchEvent::up(pointer, 45.0, 25.0));
        }

        let frame = renderer.paint(&canvas).unwrap();
        assert_eq!(rgb(&frame, 25, 25), (0, 0, 255));
    }
}
