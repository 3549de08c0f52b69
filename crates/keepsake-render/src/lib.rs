//! Keepsake image renderer.
//!
//! Rendering is split in three steps so the layout can be tested without a
//! raster backend:
//!
//! 1. [`compose::compose`] turns message text into a [`Scene`], a flat list of
//!    declarative [`Primitive`]s. Pure, no fonts, no I/O.
//! 2. [`raster::rasterize`] executes a scene onto an RGB canvas using an
//!    already-resolved [`FontSet`].
//! 3. [`raster::encode_png`] produces the bytes served to clients.
//!
//! Fonts are resolved once at startup through a [`FontResolver`]; after that,
//! the same input always yields byte-identical PNGs.

pub mod compose;
pub mod font;
pub mod primitive;
pub mod raster;
pub mod style;
pub mod wrap;

use thiserror::Error;

pub use font::{BuiltinResolver, FontError, FontResolver, FontRole, FontSet, FsFontResolver, Typeface};
pub use primitive::{HAlign, Point, Primitive, Rgba, Scene};
pub use style::Style;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas {width}x{height} cannot be drawn")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Renders keepsake PNGs with a fixed style and a fixed set of fonts.
pub struct Renderer {
    style: Style,
    fonts: FontSet,
}

impl Renderer {
    pub fn new(style: Style, fonts: FontSet) -> Self {
        Self { style, fonts }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn render(&self, message: &str, title: Option<&str>) -> Result<Vec<u8>, RenderError> {
        let scene = compose::compose(&self.style, message, title);
        let canvas = raster::rasterize(&scene, &self.fonts)?;
        raster::encode_png(&canvas)
    }
}
