use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Context;

use crate::foundation::core::ImageFormat;
use crate::foundation::error::FigportResult;

/// Decode downloaded image bytes and re-encode them in the requested
/// output format.
///
/// JPEG output drops the alpha channel; PNG keeps it.
pub fn transcode(bytes: &[u8], format: ImageFormat) -> FigportResult<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("decode downloaded image")?;
    let mut out = Vec::new();
    let mut cursor = Cursor::new(&mut out);
    match format {
        ImageFormat::Jpg => image::DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut cursor, image::ImageFormat::Jpeg)
            .context("encode jpg")?,
        ImageFormat::Png => image::DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut cursor, image::ImageFormat::Png)
            .context("encode png")?,
    }
    Ok(out)
}

/// Deterministic relative path for a persisted layer image, derived from
/// the layer name and output format.
pub fn image_path(layer_name: &str, format: ImageFormat) -> PathBuf {
    PathBuf::from("images")
        .join(format.ext())
        .join(format!("{layer_name}.{}", format.ext()))
}

#[cfg(test)]
#[path = "../../tests/unit/images/encode.rs"]
mod tests;
