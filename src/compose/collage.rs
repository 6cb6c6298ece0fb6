//! Finished collage: header band, title, date, logo and cropped body photos

use crate::compose::fit::{RESAMPLE_FILTER, draw_cropped};
use crate::compose::layout::{CanvasGeometry, Cell, LayoutTable};
use crate::compose::text::{TextStyle, draw_text};
use crate::io::configuration::{
    COLLAGE_JPEG_QUALITY, DATE_DROP, DATE_FONT_PX, HEADER_HEIGHT, HEADER_TEXT_X, LOGO_HEIGHT_INSET,
    LOGO_RIGHT_MARGIN, LOGO_TOP, TITLE_FONT_PX, TITLE_RISE,
};
use crate::io::error::{Result, composition_error};
use crate::io::image::encode_jpeg;
use crate::workflow::event::EventDetails;
use image::imageops;
use image::{DynamicImage, Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Header placements derived from the canvas geometry
///
/// Lengths are authored for the default header height and scale with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderLayout {
    /// Left edge of both text lines
    pub text_x: f64,
    /// Vertical centre of the title
    pub title_center_y: f64,
    /// Vertical centre of the date
    pub date_center_y: f64,
    /// Title glyph height
    pub title_px: u32,
    /// Date glyph height
    pub date_px: u32,
    /// Logo height
    pub logo_height: f64,
    /// Logo top edge
    pub logo_top: f64,
    /// Gap between the logo and the right canvas edge
    pub logo_right_margin: f64,
}

impl HeaderLayout {
    /// Header placements for a canvas
    pub fn for_geometry(geometry: &CanvasGeometry) -> Self {
        let header = f64::from(geometry.header_height);
        let scale = header / f64::from(HEADER_HEIGHT);
        let scaled = |length: u32| f64::from(length) * scale;
        Self {
            text_x: scaled(HEADER_TEXT_X),
            title_center_y: header / 2.0 - scaled(TITLE_RISE),
            date_center_y: header / 2.0 + scaled(DATE_DROP),
            title_px: scaled(TITLE_FONT_PX).round() as u32,
            date_px: scaled(DATE_FONT_PX).round() as u32,
            logo_height: header - scaled(LOGO_HEIGHT_INSET),
            logo_top: scaled(LOGO_TOP),
            logo_right_margin: scaled(LOGO_RIGHT_MARGIN),
        }
    }

    /// Where the logo lands for a logo of the given size, as `(x, y, width, height)`
    ///
    /// The logo keeps its aspect ratio and is right-aligned; width is capped at
    /// the canvas width.
    pub fn logo_placement(
        &self,
        canvas_width: u32,
        logo_width: u32,
        logo_height: u32,
    ) -> (i64, i64, u32, u32) {
        let height = self.logo_height.max(1.0);
        let width = (f64::from(logo_width) * height / f64::from(logo_height.max(1)))
            .clamp(1.0, f64::from(canvas_width.max(1)));
        let x = f64::from(canvas_width) - width - self.logo_right_margin;
        (
            x.round() as i64,
            self.logo_top.round() as i64,
            width.round() as u32,
            height.round() as u32,
        )
    }
}

/// Lays out and renders collages at a fixed canvas size
#[derive(Debug)]
pub struct CollageCompositor {
    geometry: CanvasGeometry,
    layouts: LayoutTable,
    quality: u8,
}

impl Default for CollageCompositor {
    fn default() -> Self {
        Self::new(CanvasGeometry::default())
    }
}

impl CollageCompositor {
    /// Compositor with the default layout table
    pub fn new(geometry: CanvasGeometry) -> Self {
        Self {
            geometry,
            layouts: LayoutTable::default(),
            quality: COLLAGE_JPEG_QUALITY,
        }
    }

    /// Replace the layout table
    #[must_use]
    pub fn with_layouts(mut self, layouts: LayoutTable) -> Self {
        self.layouts = layouts;
        self
    }

    /// Override the JPEG quality (clamped to 1..=100)
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Canvas geometry in use
    pub const fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    /// Body cells for a given photo count
    pub fn cells_for(&self, count: usize) -> Vec<Cell> {
        self.layouts.cells_for(count, &self.geometry)
    }

    /// Render the collage canvas without encoding it
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The number of photos differs from `details.photo_count`
    /// - The layout yields a different number of cells than photos
    /// - The canvas has a zero dimension
    pub fn render(
        &self,
        photos: &[DynamicImage],
        logo: &DynamicImage,
        details: &EventDetails,
    ) -> Result<RgbaImage> {
        if photos.len() != details.photo_count {
            return Err(composition_error(
                "layout",
                &format!(
                    "expected {} photos, received {}",
                    details.photo_count,
                    photos.len()
                ),
            ));
        }

        let cells = self.cells_for(details.photo_count);
        if cells.len() != photos.len() {
            return Err(composition_error(
                "layout",
                &format!(
                    "layout for {} photos produced {} cells",
                    photos.len(),
                    cells.len()
                ),
            ));
        }

        let CanvasGeometry { width, height, .. } = self.geometry;
        if width == 0 || height == 0 {
            return Err(composition_error("canvas", &"canvas has no pixels"));
        }

        let mut canvas = RgbaImage::from_pixel(width, height, WHITE);
        self.draw_header(&mut canvas, logo, details);

        for (photo, cell) in photos.iter().zip(&cells) {
            draw_cropped(&mut canvas, photo, cell.to_pixels());
        }

        Ok(canvas)
    }

    /// Render and encode the collage as JPEG
    ///
    /// Identical inputs always produce identical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the canvas cannot be encoded
    pub fn compose(
        &self,
        photos: &[DynamicImage],
        logo: &DynamicImage,
        details: &EventDetails,
    ) -> Result<Vec<u8>> {
        let canvas = self.render(photos, logo, details)?;
        encode_jpeg(&canvas, self.quality)
    }

    fn draw_header(&self, canvas: &mut RgbaImage, logo: &DynamicImage, details: &EventDetails) {
        let header = HeaderLayout::for_geometry(&self.geometry);
        let band = RgbaImage::from_pixel(
            self.geometry.width,
            self.geometry.header_height.min(self.geometry.height),
            details.header_color.to_rgba(),
        );
        imageops::replace(canvas, &band, 0, 0);

        let text_x = header.text_x.round() as i64;
        let title_style = TextStyle {
            size_px: header.title_px,
            bold: true,
            color: WHITE,
        };
        draw_text(
            canvas,
            &details.title,
            text_x,
            header.title_center_y.round() as i64,
            &title_style,
        );

        let date_style = TextStyle {
            size_px: header.date_px,
            bold: false,
            color: WHITE,
        };
        draw_text(
            canvas,
            &details.formatted_date(),
            text_x,
            header.date_center_y.round() as i64,
            &date_style,
        );

        let (x, y, width, height) =
            header.logo_placement(self.geometry.width, logo.width(), logo.height());
        let scaled = imageops::resize(logo, width, height, RESAMPLE_FILTER);
        imageops::overlay(canvas, &scaled, x, y);
    }
}
