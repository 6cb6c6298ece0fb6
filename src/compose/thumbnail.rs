//! Contact sheet tiling every candidate photo for the selection model

use crate::compose::fit::draw_letterboxed;
use crate::compose::layout::PixelRect;
use crate::io::configuration::{THUMBNAIL_COLUMNS, THUMBNAIL_JPEG_QUALITY, THUMBNAIL_SIZE};
use crate::io::error::{Result, composition_error};
use crate::io::image::encode_jpeg;
use image::{DynamicImage, Rgba, RgbaImage};

/// Size of a contact sheet for `count` photos, as `(width, height)`
///
/// The sheet is always four cells wide; rows grow with the count.
pub const fn grid_dimensions(count: usize) -> (u32, u32) {
    let rows = count.div_ceil(THUMBNAIL_COLUMNS as usize) as u32;
    (THUMBNAIL_COLUMNS * THUMBNAIL_SIZE, rows * THUMBNAIL_SIZE)
}

/// Cell occupied by the photo at `index`
pub const fn thumbnail_cell(index: usize) -> PixelRect {
    let columns = THUMBNAIL_COLUMNS as usize;
    let row = (index / columns) as u32;
    let col = (index % columns) as u32;
    PixelRect {
        x: (col * THUMBNAIL_SIZE) as i64,
        y: (row * THUMBNAIL_SIZE) as i64,
        width: THUMBNAIL_SIZE,
        height: THUMBNAIL_SIZE,
    }
}

/// Render the contact sheet; each photo is letterboxed on white, never cropped
///
/// # Errors
///
/// Returns an error if `images` is empty
pub fn render_thumbnail_grid(images: &[DynamicImage]) -> Result<RgbaImage> {
    if images.is_empty() {
        return Err(composition_error(
            "thumbnail grid",
            &"no photos to tile",
        ));
    }

    let (width, height) = grid_dimensions(images.len());
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    for (index, image) in images.iter().enumerate() {
        draw_letterboxed(&mut canvas, image, thumbnail_cell(index));
    }
    Ok(canvas)
}

/// Render and JPEG-encode the contact sheet
///
/// # Errors
///
/// Returns an error if `images` is empty or encoding fails
pub fn compose_thumbnail_grid(images: &[DynamicImage]) -> Result<Vec<u8>> {
    let canvas = render_thumbnail_grid(images)?;
    encode_jpeg(&canvas, THUMBNAIL_JPEG_QUALITY)
}
