use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Decodes an image file to 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("decoding texture {}", path.display()))?
        .to_rgba8();

    log::info!(
        "Loaded texture {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Two-tone checkerboard with `cells` squares per side.
pub fn checkerboard(size: u32, cells: u32, light: [u8; 3], dark: [u8; 3]) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        let [r, g, b] = if ((x / cell) + (y / cell)) % 2 == 0 {
            light
        } else {
            dark
        };
        Rgba([r, g, b, 255])
    })
}

/// 1x1 opaque image of a single color.
pub fn solid(rgb: [u8; 3]) -> RgbaImage {
    let [r, g, b] = rgb;
    RgbaImage::from_pixel(1, 1, Rgba([r, g, b, 255]))
}

/// Bound for untextured materials.
pub fn white_pixel() -> RgbaImage {
    solid([255, 255, 255])
}
