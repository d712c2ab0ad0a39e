use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{Options, Tree},
};

use super::fonts::Fonts;
use crate::error::AppError;

/// Rasterizes `svg` into a PNG of exactly `width` x `height`.
pub fn rasterize(svg: &str, fonts: &Fonts, width: u32, height: u32) -> Result<Vec<u8>, AppError> {
    let options = Options {
        fontdb: fonts.database(),
        ..Options::default()
    };

    let tree = Tree::from_str(svg, &options)
        .map_err(|e| AppError::RenderError(format!("Invalid SVG: {e}")))?;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| AppError::RenderError(format!("Invalid canvas {width}x{height}")))?;

    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| AppError::RenderError(format!("PNG encoding failed: {e}")))
}
