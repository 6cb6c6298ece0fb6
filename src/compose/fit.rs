//! Aspect-preserving placement: center-crop to fill, or letterbox to fit

use crate::compose::layout::PixelRect;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Resampling filter used for every scaled draw
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Source region, in source pixels, that fills a target of the given shape
///
/// A relatively wider source loses equal left/right margins; a relatively
/// taller one loses equal top/bottom margins. Returns `(x, y, width, height)`.
pub fn center_crop_region(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32, u32, u32) {
    let src_w = f64::from(source_width.max(1));
    let src_h = f64::from(source_height.max(1));
    let target_ratio = f64::from(target_width.max(1)) / f64::from(target_height.max(1));

    let (sx, sy, sw, sh) = if src_w / src_h > target_ratio {
        let sw = src_h * target_ratio;
        ((src_w - sw) / 2.0, 0.0, sw, src_h)
    } else {
        let sh = src_w / target_ratio;
        (0.0, (src_h - sh) / 2.0, src_w, sh)
    };

    let width = (sw.round() as u32).clamp(1, source_width.max(1));
    let height = (sh.round() as u32).clamp(1, source_height.max(1));
    let x = (sx.round() as u32).min(source_width.saturating_sub(width));
    let y = (sy.round() as u32).min(source_height.saturating_sub(height));
    (x, y, width, height)
}

/// Scaled size and offset that fit a source inside a cell without cropping
///
/// Returns `(offset_x, offset_y, width, height)` relative to the cell origin;
/// the image is centred and the remainder of the cell is left untouched.
pub fn letterbox_region(
    source_width: u32,
    source_height: u32,
    cell_width: u32,
    cell_height: u32,
) -> (u32, u32, u32, u32) {
    let src_w = f64::from(source_width.max(1));
    let src_h = f64::from(source_height.max(1));
    let scale = (f64::from(cell_width) / src_w).min(f64::from(cell_height) / src_h);

    let width = ((src_w * scale).round() as u32).clamp(1, cell_width.max(1));
    let height = ((src_h * scale).round() as u32).clamp(1, cell_height.max(1));
    let x = (cell_width.saturating_sub(width)) / 2;
    let y = (cell_height.saturating_sub(height)) / 2;
    (x, y, width, height)
}

/// Draw `image` so it exactly fills `rect`, cropping the overflow
pub fn draw_cropped(canvas: &mut RgbaImage, image: &DynamicImage, rect: PixelRect) {
    let (sx, sy, sw, sh) = center_crop_region(image.width(), image.height(), rect.width, rect.height);
    let cropped = image.crop_imm(sx, sy, sw, sh);
    let scaled = imageops::resize(&cropped, rect.width, rect.height, RESAMPLE_FILTER);
    imageops::overlay(canvas, &scaled, rect.x, rect.y);
}

/// Draw `image` scaled uniformly and centred inside `rect`, never cropping
pub fn draw_letterboxed(canvas: &mut RgbaImage, image: &DynamicImage, rect: PixelRect) {
    let (dx, dy, width, height) =
        letterbox_region(image.width(), image.height(), rect.width, rect.height);
    let scaled = imageops::resize(image, width, height, RESAMPLE_FILTER);
    imageops::overlay(
        canvas,
        &scaled,
        rect.x + i64::from(dx),
        rect.y + i64::from(dy),
    );
}
