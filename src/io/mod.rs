/// Photo archive extraction
pub mod archive;
/// Command-line front end
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error taxonomy
pub mod error;
/// Raster decoding and encoding
pub mod image;
/// Logging setup
pub mod logging;
/// Attempt progress display
pub mod progress;
