//! Collage geometry constants and runtime configuration defaults

// Output canvas
/// Width of the finished collage in pixels
pub const CANVAS_WIDTH: u32 = 2400;
/// Height of the finished collage in pixels
pub const CANVAS_HEIGHT: u32 = 3000;
/// Height of the colored header band
pub const HEADER_HEIGHT: u32 = 300;
/// Gap between body cells and between cells and the canvas edge
pub const PADDING: u32 = 20;

// Header typography, in pixels at the default header height
/// Title glyph height
pub const TITLE_FONT_PX: u32 = 100;
/// Date glyph height
pub const DATE_FONT_PX: u32 = 60;
/// Left inset of header text
pub const HEADER_TEXT_X: u32 = 60;
/// Title centre line sits this far above the header midline
pub const TITLE_RISE: u32 = 40;
/// Date centre line sits this far below the header midline
pub const DATE_DROP: u32 = 60;
/// Logo height is the header height minus this
pub const LOGO_HEIGHT_INSET: u32 = 100;
/// Distance from the canvas top to the logo
pub const LOGO_TOP: u32 = 50;
/// Distance from the canvas right edge to the logo
pub const LOGO_RIGHT_MARGIN: u32 = 60;

// Layout table dimensions, in pixels at the default canvas size
/// Hero column width for four-photo collages (including its right gap)
pub const HERO_WIDTH: u32 = 1500;
/// Banner height for five-photo collages
pub const FIVE_BANNER_HEIGHT: u32 = 1400;
/// Banner height for seven-photo collages
pub const SEVEN_BANNER_HEIGHT: u32 = 1200;

// Contact sheet sent to the selection model
/// Edge length of one contact-sheet cell
pub const THUMBNAIL_SIZE: u32 = 256;
/// Number of contact-sheet columns
pub const THUMBNAIL_COLUMNS: u32 = 4;
/// Largest edge a baseline JPEG can carry
pub const JPEG_MAX_DIMENSION: u32 = 65_535;
/// Most photos one contact sheet can tile before its height overflows JPEG
pub const MAX_CONTACT_SHEET_PHOTOS: usize =
    (JPEG_MAX_DIMENSION / THUMBNAIL_SIZE * THUMBNAIL_COLUMNS) as usize;

// Encoding
/// JPEG quality of the contact sheet
pub const THUMBNAIL_JPEG_QUALITY: u8 = 85;
/// JPEG quality of the finished collage
pub const COLLAGE_JPEG_QUALITY: u8 = 92;

// Retry loop
/// Maximum select/compose/score attempts per run
pub const MAX_ATTEMPTS: usize = 3;
// Strictly greater than; a score of exactly 9 keeps retrying
/// Score above which the run stops early
pub const SUCCESS_THRESHOLD: f64 = 9.0;
/// Highest score the scoring parser will report
pub const MAX_SCORE: f64 = 10.0;

// Inference service
/// Model used for both selection and scoring
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Base URL of the `generateContent` REST API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Environment variable consulted for the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 120;
/// Retries after a rate-limited (429) response
pub const RATE_LIMIT_RETRIES: u32 = 3;
/// First backoff delay after a rate-limited response
pub const RATE_LIMIT_BACKOFF_MS: u64 = 2000;
/// Feedback reported when the scoring call itself fails
pub const SCORING_FALLBACK_TEXT: &str =
    "Virality check could not be completed due to an API error.";

// Archive filtering
/// File extensions accepted from the photo archive (lowercase)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

// Event defaults
/// Header color used when none is given
pub const DEFAULT_HEADER_COLOR: &str = "#004646";
/// Photo count used when none is given
pub const DEFAULT_PHOTO_COUNT: usize = 4;

// Output settings
/// Base name of the written collage and feedback files
pub const DEFAULT_OUTPUT_STEM: &str = "social_media_collage";
/// Extension of the written collage
pub const COLLAGE_EXTENSION: &str = "jpg";
/// Extension of the written feedback text
pub const FEEDBACK_EXTENSION: &str = "txt";

// Progress display
/// Width of the attempt progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 30;
/// Spinner refresh interval
pub const PROGRESS_TICK_MS: u64 = 120;
