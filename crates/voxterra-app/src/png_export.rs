//! PNG encoding of height field previews.

use std::io::Cursor;
use std::path::Path;

use voxterra_terrain::PreviewImage;

use crate::error::AppError;

/// Encodes an RGBA preview as an 8-bit PNG.
///
/// PNG dimensions are 32-bit; larger previews fail with
/// [`AppError::PreviewTooLarge`].
pub fn encode_png(image: &PreviewImage) -> Result<Vec<u8>, AppError> {
    let too_large = || AppError::PreviewTooLarge {
        width: image.width,
        height: image.height,
    };
    let width = u32::try_from(image.width).map_err(|_| too_large())?;
    let height = u32::try_from(image.height).map_err(|_| too_large())?;

    let mut png_buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(Cursor::new(&mut png_buf), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.pixels)?;
        writer.finish()?;
    }
    Ok(png_buf)
}

/// Writes `image` to `path`, creating missing parent directories.
pub fn write_png(path: &Path, image: &PreviewImage) -> Result<(), AppError> {
    let bytes = encode_png(image)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    tracing::info!(
        "wrote {}x{} preview to {}",
        image.width,
        image.height,
        path.display()
    );
    Ok(())
}
