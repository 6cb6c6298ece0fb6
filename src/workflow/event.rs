//! Event details supplied by the caller for one collage run

use crate::io::error::{Result, validation_error};
use chrono::NaiveDate;
use image::Rgba;
use std::fmt;
use std::str::FromStr;

/// Header band color parsed from a `#RRGGBB` or `#RGB` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl HeaderColor {
    /// Build from channel values
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA pixel of this color
    pub const fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl FromStr for HeaderColor {
    type Err = crate::io::error::CollageError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let expanded = match hex.len() {
            6 => hex.to_string(),
            // #abc is shorthand for #aabbcc
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => {
                return Err(validation_error(
                    "header_color",
                    &format!("'{s}' is not a #RRGGBB or #RGB color"),
                ));
            }
        };

        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(validation_error(
                "header_color",
                &format!("'{s}' contains non-hex digits"),
            ));
        }

        let value = u32::from_str_radix(&expanded, 16).map_err(|e| {
            validation_error("header_color", &format!("'{s}' is not a hex color: {e}"))
        })?;
        Ok(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }
}

impl fmt::Display for HeaderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Immutable description of the event a collage is built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    /// Header title
    pub title: String,
    /// Event date
    pub date: NaiveDate,
    /// Header band color
    pub header_color: HeaderColor,
    /// Number of photos in the collage
    pub photo_count: usize,
}

impl EventDetails {
    /// Build event details
    ///
    /// # Errors
    ///
    /// Returns an error if `photo_count` is zero
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        header_color: HeaderColor,
        photo_count: usize,
    ) -> Result<Self> {
        if photo_count == 0 {
            return Err(validation_error(
                "photo_count",
                &"a collage needs at least one photo",
            ));
        }
        Ok(Self {
            title: title.into(),
            date,
            header_color,
            photo_count,
        })
    }

    /// Build event details from their textual configuration form
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `date` is not an ISO `YYYY-MM-DD` calendar date
    /// - `header_color` is not a hex color
    /// - `photo_count` is zero
    pub fn parse(title: &str, date: &str, header_color: &str, photo_count: usize) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            validation_error("date", &format!("'{date}' is not an ISO date: {e}"))
        })?;
        Self::new(title, date, header_color.parse()?, photo_count)
    }

    /// Long-form US English date, e.g. "March 5, 2024"
    pub fn formatted_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}
