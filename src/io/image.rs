//! Raster decoding and JPEG encoding

use crate::io::archive::PhotoAsset;
use crate::io::error::{CollageError, Result, composition_error};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use rayon::prelude::*;

/// Decode one asset into a raster
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or have a zero
/// dimension
pub fn decode_asset(asset: &PhotoAsset) -> Result<DynamicImage> {
    decode_bytes(&asset.name, &asset.bytes)
}

/// Decode raw bytes into a raster, labelling failures with `name`
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or have a zero
/// dimension
pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| CollageError::ImageDecode {
        name: name.to_string(),
        source: e,
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(composition_error(
            "decode",
            &format!("image '{name}' has no pixels"),
        ));
    }

    Ok(img)
}

/// Decode several assets on the rayon pool, preserving input order
///
/// Placement depends only on position in `assets`, never on completion
/// order.
///
/// # Errors
///
/// Returns a decode error if any asset fails; no partial batch is returned
pub fn decode_all(assets: &[&PhotoAsset]) -> Result<Vec<DynamicImage>> {
    assets.par_iter().map(|asset| decode_asset(asset)).collect()
}

/// Decode assets in parallel and shrink each to fit a `max_side` square
///
/// Only the shrunken rasters are kept, so memory grows with the thumbnail
/// size rather than the source resolution. Smaller images are left as is.
///
/// # Errors
///
/// Returns a decode error if any asset fails
pub fn decode_thumbnails(assets: &[&PhotoAsset], max_side: u32) -> Result<Vec<DynamicImage>> {
    assets
        .par_iter()
        .map(|asset| {
            let image = decode_asset(asset)?;
            if image.width() > max_side || image.height() > max_side {
                Ok(image.thumbnail(max_side, max_side))
            } else {
                Ok(image)
            }
        })
        .collect()
}

/// Encode an RGBA canvas as baseline JPEG, dropping alpha
///
/// # Errors
///
/// Returns an error if the encoder rejects the canvas
pub fn encode_jpeg(canvas: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CollageError::ImageEncode { source: e })?;
    Ok(buffer)
}
