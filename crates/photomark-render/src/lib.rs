//! Photomark Render Library
//!
//! CPU rendering for Photomark: live canvas frames and the full-resolution
//! bake, both drawn with tiny-skia.

pub mod bake;
pub mod live;
mod renderer;

pub use bake::{bake, bake_canvas, decode_source};
pub use live::{LiveRenderer, LiveStyle};
pub use renderer::{
    PixmapSurface, RenderError, RenderResult, composite_items, composite_layer_onto_rgba,
    pixmap_from_rgba, render_layer, rgba_from_pixmap,
};
