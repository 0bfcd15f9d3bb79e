//! Full-resolution bake of committed annotations onto the source photo.

use crate::renderer::{
    RenderError, RenderResult, composite_layer_onto_rgba, render_layer, validate_canvas,
};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageError, ImageReader, RgbaImage};
use kurbo::{Affine, Size};
use photomark_core::canvas::Canvas;
use photomark_core::config::{BakeConfig, OutputFormat};
use photomark_core::shapes::Item;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Decode the photo at `path` into straight RGBA.
///
/// The format is sniffed from the file contents, so extensionless or
/// mislabelled files still decode.
pub fn decode_source(path: &Path) -> RenderResult<RgbaImage> {
    let decode_error = |source| RenderError::SourceDecode {
        path: path.to_path_buf(),
        source,
    };
    let image = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| decode_error(ImageError::IoError(err)))?
        .decode()
        .map_err(decode_error)?;
    Ok(image.into_rgba8())
}

/// Canvas-to-image mapping for a bake.
pub fn bake_transform(image_size: Size, canvas_size: Size) -> Affine {
    Affine::scale_non_uniform(
        image_size.width / canvas_size.width,
        image_size.height / canvas_size.height,
    )
}

/// Bake the canvas's committed items onto the photo at `source`.
pub fn bake_canvas(source: &Path, canvas: &Canvas, config: &BakeConfig) -> RenderResult<PathBuf> {
    bake(source, canvas.items(), canvas.canvas_size(), config)
}

/// Draw `items`, authored on a canvas of `canvas_size`, onto the photo at
/// `source` at full resolution and write the result to a new file.
///
/// The source file is never written. On error nothing is left on disk.
pub fn bake(
    source: &Path,
    items: &[Item],
    canvas_size: Size,
    config: &BakeConfig,
) -> RenderResult<PathBuf> {
    log::info!("Baking {} items onto {}", items.len(), source.display());
    let result = bake_inner(source, items, canvas_size, config);
    match &result {
        Ok(path) => log::info!("Baked image written to {}", path.display()),
        Err(err) => log::error!("Bake of {} failed: {err}", source.display()),
    }
    result
}

fn bake_inner(
    source: &Path,
    items: &[Item],
    canvas_size: Size,
    config: &BakeConfig,
) -> RenderResult<PathBuf> {
    validate_canvas(canvas_size)?;
    let mut photo = decode_source(source)?;
    let (width, height) = photo.dimensions();

    let transform = bake_transform(
        Size::new(f64::from(width), f64::from(height)),
        canvas_size,
    );
    log::debug!("Bake scale {:?} for {width}x{height}", transform.as_coeffs());
    let layer = render_layer(width, height, items, transform)
        .ok_or(RenderError::EmptyImage { width, height })?;
    composite_layer_onto_rgba(&mut photo, &layer)?;

    write_output(source, photo, config)
}

/// Name for a new bake of `source`: `<prefix>_<stem>_<id>.<ext>`.
pub fn output_name(source: &Path, config: &BakeConfig) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    format!(
        "{}_{}_{}.{}",
        config.file_prefix,
        stem,
        Uuid::new_v4().simple(),
        config.format.extension()
    )
}

fn write_output(source: &Path, image: RgbaImage, config: &BakeConfig) -> RenderResult<PathBuf> {
    let dir = config.output_dir_for(source);
    fs::create_dir_all(&dir)?;
    let target = dir.join(output_name(source, config));

    let mut file = tempfile::Builder::new()
        .prefix(".photomark-")
        .suffix(".part")
        .tempfile_in(&dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        encode(&mut writer, image, config)?;
        writer.flush()?;
    }
    file.persist_noclobber(&target)
        .map_err(|err| RenderError::Io(err.error))?;
    Ok(target)
}

fn encode<W: Write>(writer: &mut W, image: RgbaImage, config: &BakeConfig) -> RenderResult<()> {
    match config.format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image).into_rgb8();
            let encoder = JpegEncoder::new_with_quality(writer, config.quality());
            rgb.write_with_encoder(encoder).map_err(RenderError::Encode)
        }
        OutputFormat::Png => image
            .write_with_encoder(PngEncoder::new(writer))
            .map_err(RenderError::Encode),
    }
}
