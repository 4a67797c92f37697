//! SVG to raster conversion and image encoding.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, LazyLock},
};

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{png::PngEncoder, webp::WebPEncoder},
};
use log::{debug, info};
use resvg::{
    tiny_skia::{self, Pixmap, Transform},
    usvg::{self, fontdb},
};

use astrolabe_core::color::Color;

use super::{Error, OutputFormat};
use crate::error::AstrolabeError;

/// Fallbacks for the generic sans-serif family when the platform default is missing.
const SANS_SERIF_CANDIDATES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans"];

/// System font database shared by every render.
///
/// Loading system fonts is slow, so it happens once, on first use.
static FONT_DB: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    if !has_family(&db, "Arial") {
        let fallback = SANS_SERIF_CANDIDATES
            .iter()
            .copied()
            .find(|&name| has_family(&db, name));
        if let Some(name) = fallback {
            db.set_sans_serif_family(name);
        }
    }

    info!(faces = db.len(); "Loaded system fonts");
    Arc::new(db)
});

fn has_family(db: &fontdb::Database, name: &str) -> bool {
    db.faces()
        .any(|face| face.families.iter().any(|(family, _)| family == name))
}

/// Parses an SVG document into a render tree.
///
/// # Errors
///
/// Returns [`AstrolabeError::Render`] if the document is not valid SVG.
pub fn parse_svg(svg: &str, font_family: &str) -> Result<usvg::Tree, AstrolabeError> {
    let opts = usvg::Options {
        fontdb: FONT_DB.clone(),
        font_family: font_family.to_string(),
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts).map_err(|err| AstrolabeError::Render(err.to_string()))
}

/// Renders `tree` into a `width` x `height` pixmap, stretching it to fill.
///
/// The pixmap is filled with `background` first; without one it stays
/// transparent.
pub fn rasterize(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    background: Option<Color>,
) -> Result<Pixmap, Error> {
    let mut pixmap = Pixmap::new(width, height).ok_or(Error::Pixmap { width, height })?;

    if let Some(color) = background {
        let [r, g, b, a] = color.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    debug!(width = width, height = height; "Rasterized document");
    Ok(pixmap)
}

/// Encodes `pixmap` in `format` and writes it to `path`.
pub fn write_image(pixmap: &Pixmap, format: OutputFormat, path: &Path) -> Result<(), Error> {
    let data = straight_rgba(pixmap);
    let (width, height) = (pixmap.width(), pixmap.height());

    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Png => PngEncoder::new(&mut writer).write_image(
            &data,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?,
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut writer).write_image(
            &data,
            width,
            height,
            ExtendedColorType::Rgba8,
        )?,
    }
    writer.flush()?;

    Ok(())
}

/// Pixmap data is premultiplied; encoders expect straight alpha.
fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="0" y="0" width="5" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn test_parse_svg_invalid() {
        let err = parse_svg("<svg", "sans-serif").unwrap_err();
        assert!(matches!(err, AstrolabeError::Render(_)));
    }

    #[test]
    fn test_rasterize_scales_to_requested_size() {
        let tree = parse_svg(SQUARE, "sans-serif").unwrap();
        let pixmap = rasterize(&tree, 40, 40, Some(Color::white())).unwrap();

        assert_eq!((pixmap.width(), pixmap.height()), (40, 40));

        let left = pixmap.pixel(5, 20).unwrap().demultiply();
        assert_eq!((left.red(), left.green(), left.blue()), (255, 0, 0));

        let right = pixmap.pixel(35, 20).unwrap().demultiply();
        assert_eq!(
            (right.red(), right.green(), right.blue(), right.alpha()),
            (255, 255, 255, 255)
        );
    }

    #[test]
    fn test_rasterize_transparent_background() {
        let tree = parse_svg(SQUARE, "sans-serif").unwrap();
        let pixmap = rasterize(&tree, 10, 10, None).unwrap();
        assert_eq!(pixmap.pixel(8, 5).unwrap().alpha(), 0);
    }

    #[test]
    fn test_rasterize_zero_size_fails() {
        let tree = parse_svg(SQUARE, "sans-serif").unwrap();
        let err = rasterize(&tree, 0, 10, None).unwrap_err();
        assert!(matches!(err, Error::Pixmap { width: 0, height: 10 }));
    }

    #[test]
    fn test_write_image_png_and_webp() {
        let dir = tempfile::tempdir().unwrap();
        let tree = parse_svg(SQUARE, "sans-serif").unwrap();
        let pixmap = rasterize(&tree, 20, 20, Some(Color::white())).unwrap();

        let png = dir.path().join("square.png");
        write_image(&pixmap, OutputFormat::Png, &png).unwrap();
        let bytes = std::fs::read(&png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let webp = dir.path().join("square.webp");
        write_image(&pixmap, OutputFormat::WebP, &webp).unwrap();
        let bytes = std::fs::read(&webp).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_write_image_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tree = parse_svg(SQUARE, "sans-serif").unwrap();
        let pixmap = rasterize(&tree, 4, 4, None).unwrap();

        let path = dir.path().join("missing").join("out.png");
        let err = write_image(&pixmap, OutputFormat::Png, &path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
