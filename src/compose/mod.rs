//! Image compositing: layout table, placement policies, text and the two canvases

/// Collage compositor producing the finished image
pub mod collage;
/// Center-crop and letterbox placement
pub mod fit;
/// Photo-count keyed layout strategies
pub mod layout;
/// Bitmap header text
pub mod text;
/// Contact sheet for the selection model
pub mod thumbnail;

pub use collage::CollageCompositor;
pub use layout::{CanvasGeometry, Cell, LayoutStrategy, LayoutTable};
