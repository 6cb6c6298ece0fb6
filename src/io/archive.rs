//! Photo archive extraction with extension-based filtering

use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{CollageError, Result};
use std::io::{Cursor, Read};
use std::path::Path;

/// Media type inferred from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// `image/webp`
    Webp,
    /// `image/gif`
    Gif,
    /// `application/octet-stream`, for anything unrecognised
    OctetStream,
}

impl MediaType {
    /// Infer the media type from a file name's extension (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            Some("webp") => Self::Webp,
            Some("gif") => Self::Gif,
            _ => Self::OctetStream,
        }
    }

    /// MIME string for this media type
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

/// One photo from the working set
///
/// The name is the entry's full path inside the archive and is used as the
/// identifier the selection model refers back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    /// Unique identifier (archive entry name or file name)
    pub name: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Media type inferred from the name
    pub media_type: MediaType,
}

impl PhotoAsset {
    /// Wrap raw bytes, inferring the media type from the name
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = MediaType::from_name(&name);
        Self {
            name,
            bytes,
            media_type,
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether a name carries one of the accepted image extensions
pub fn is_supported_image(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

// macOS archivers add resource-fork shadows ("__MACOSX/", "._name.jpg")
// that carry image extensions but no image data
fn is_metadata_entry(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("._"))
}

/// Extract every image entry from a zip bundle, in archive order
///
/// Directory entries and entries without an accepted image extension are
/// skipped silently.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not a readable zip archive
/// - Any retained entry's data cannot be read (no partial result is returned)
pub fn extract_photos(bundle: &[u8]) -> Result<Vec<PhotoAsset>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bundle))?;
    let mut photos = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| CollageError::ArchiveEntry {
                entry: format!("#{index}"),
                source: std::io::Error::other(e),
            })?;

        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if !is_supported_image(&name) || is_metadata_entry(&name) {
            continue;
        }

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| CollageError::ArchiveEntry {
                entry: name.clone(),
                source: e,
            })?;

        photos.push(PhotoAsset::new(name, bytes));
    }

    tracing::debug!(count = photos.len(), "extracted photos from archive");
    Ok(photos)
}
