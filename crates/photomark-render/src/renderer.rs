//! CPU raster surface shared by live paint and bake.

use image::{Rgba, RgbaImage};
use kurbo::{Affine, BezPath, PathEl, Size};
use peniko::Color;
use photomark_core::shapes::{Item, PaintMode, SerializableColor, StrokePaint, Surface};
use std::path::PathBuf;
use thiserror::Error;
use tiny_skia::{
    BlendMode, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to decode source image {path}: {source}")]
    SourceDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("Encoding failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Reject canvas sizes items cannot be mapped from.
pub fn validate_canvas(size: Size) -> RenderResult<()> {
    let valid = size.width.is_finite()
        && size.height.is_finite()
        && size.width > 0.0
        && size.height > 0.0;
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidCanvas {
            width: size.width,
            height: size.height,
        })
    }
}

pub fn to_skia_color(color: Color) -> tiny_skia::Color {
    let c = SerializableColor::from(color);
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path. `None` for paths tiny-skia cannot represent.
pub fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Straight RGBA to a premultiplied pixmap.
///
/// Premultiplying to 8 bits is lossy for translucent pixels, so converting
/// back with [`rgba_from_pixmap`] can shift their color channels.
pub fn pixmap_from_rgba(image: &RgbaImage) -> RenderResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::EmptyImage { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Premultiplied pixmap back to straight RGBA.
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// [`Surface`] over a tiny-skia pixmap.
///
/// `base` maps item coordinates to pixmap pixels and is applied after each
/// item's own paint transform, so stroke widths scale with it.
pub struct PixmapSurface<'a> {
    pixmap: &'a mut Pixmap,
    base: Affine,
}

impl<'a> PixmapSurface<'a> {
    pub fn new(pixmap: &'a mut Pixmap, base: Affine) -> Self {
        Self { pixmap, base }
    }
}

impl Surface for PixmapSurface<'_> {
    fn stroke_path(&mut self, path: &BezPath, paint: &StrokePaint, transform: Affine) {
        let Some(skia_path) = to_skia_path(path) else {
            log::trace!("Skipping empty path");
            return;
        };

        let mut skia_paint = Paint::default();
        skia_paint.anti_alias = true;
        match paint.mode {
            PaintMode::Color => skia_paint.set_color(to_skia_color(paint.color)),
            PaintMode::Clear => skia_paint.blend_mode = BlendMode::Clear,
        }

        let stroke = Stroke {
            width: paint.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        self.pixmap.stroke_path(
            &skia_path,
            &skia_paint,
            &stroke,
            to_skia_transform(self.base * transform),
            None,
        );
    }
}

/// Draw `items` in order onto a transparent `width` x `height` layer.
///
/// Erase strokes clear the layer, so they remove earlier annotations while
/// later items draw over them. `None` for an empty size.
pub fn render_layer<'a>(
    width: u32,
    height: u32,
    items: impl IntoIterator<Item = &'a Item>,
    base: Affine,
) -> Option<Pixmap> {
    let mut layer = Pixmap::new(width, height)?;
    let mut surface = PixmapSurface::new(&mut layer, base);
    for item in items {
        item.draw(&mut surface);
    }
    Some(layer)
}

fn draw_layer(target: &mut Pixmap, layer: &Pixmap) {
    target.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// Draw `items` onto a layer, then composite the layer over `target`.
///
/// Erased areas reveal whatever `target` holds.
pub fn composite_items<'a>(
    target: &mut Pixmap,
    items: impl IntoIterator<Item = &'a Item>,
    base: Affine,
) {
    if let Some(layer) = render_layer(target.width(), target.height(), items, base) {
        draw_layer(target, &layer);
    }
}

/// Composite `layer` over a straight RGBA `image` of the same size.
///
/// Only pixels the layer touches go through premultiplied blending. Every
/// other pixel keeps its exact source value.
pub fn composite_layer_onto_rgba(image: &mut RgbaImage, layer: &Pixmap) -> RenderResult<()> {
    let mut blended = pixmap_from_rgba(image)?;
    draw_layer(&mut blended, layer);
    for ((dst, src), cover) in image
        .pixels_mut()
        .zip(blended.pixels())
        .zip(layer.pixels())
    {
        if cover.alpha() != 0 {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use photomark_core::shapes::{ItemStyle, Rectangle, Stroke as StrokeItem};

    fn line(from: Point, to: Point, style: ItemStyle, erase: bool) -> Item {
        Item::Stroke(StrokeItem::from_points(vec![from, to], style, erase))
    }

    #[test]
    fn test_validate_canvas() {
        assert!(validate_canvas(Size::new(10.0, 20.0)).is_ok());
        assert!(validate_canvas(Size::ZERO).is_err());
        assert!(validate_canvas(Size::new(f64::NAN, 5.0)).is_err());
    }

    #[test]
    fn test_transform_conversion() {
        let t = to_skia_transform(Affine::translate((3.0, 4.0)) * Affine::scale(2.0));
        assert_eq!((t.sx, t.sy, t.tx, t.ty), (2.0, 2.0, 3.0, 4.0));
        assert_eq!((t.kx, t.ky), (0.0, 0.0));
    }

    #[test]
    fn test_path_conversion() {
        let rect = Rect::new(0.0, 0.0, 10.0, 5.0);
        let path = to_skia_path(&kurbo::Shape::to_path(&rect, 0.1)).unwrap();
        let bounds = path.bounds();
        assert_eq!((bounds.width(), bounds.height()), (10.0, 5.0));
        assert!(to_skia_path(&BezPath::new()).is_none());
    }

    #[test]
    fn test_rgba_premultiply_roundtrip_opaque() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let pixmap = pixmap_from_rgba(&image).unwrap();
        assert_eq!(rgba_from_pixmap(&pixmap), image);
        assert!(pixmap_from_rgba(&RgbaImage::new(0, 4)).is_err());
    }

    #[test]
    fn test_erase_reveals_target_and_spares_later_items() {
        let mut target = Pixmap::new(100, 100).unwrap();
        target.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));

        let red = ItemStyle::new(SerializableColor::red(), 20.0);
        let green = ItemStyle::new(SerializableColor::new(0, 255, 0, 255), 6.0);
        let items = [
            line(Point::new(10.0, 50.0), Point::new(90.0, 50.0), red.clone(), false),
            line(Point::new(50.0, 10.0), Point::new(50.0, 90.0), red, true),
            line(Point::new(50.0, 10.0), Point::new(50.0, 90.0), green, false),
        ];
        composite_items(&mut target, &items, Affine::IDENTITY);

        let at = |x, y| {
            let c = target.pixel(x, y).unwrap();
            (c.red(), c.green(), c.blue())
        };
        assert_eq!(at(25, 50), (255, 0, 0));
        assert_eq!(at(44, 50), (0, 0, 255));
        assert_eq!(at(50, 50), (0, 255, 0));
        assert_eq!(at(50, 25), (0, 255, 0));
        assert_eq!(at(44, 25), (0, 0, 255));
    }

    #[test]
    fn test_base_transform_scales_width() {
        let mut target = Pixmap::new(100, 100).unwrap();
        let style = ItemStyle::new(SerializableColor::black(), 2.0);
        let item = Item::Rectangle(Rectangle::new(Rect::new(2.0, 2.0, 8.0, 8.0), style));
        composite_items(&mut target, [&item], Affine::scale(10.0));

        // The left edge sits at x = 20 with a scaled half-width of 10.
        assert_eq!(target.pixel(12, 50).unwrap().alpha(), 255);
        assert_eq!(target.pixel(27, 50).unwrap().alpha(), 255);
        assert_eq!(target.pixel(50, 50).unwrap().alpha(), 0);
    }
}
