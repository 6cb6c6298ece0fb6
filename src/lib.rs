//! AI-curated event photo collages
//!
//! A batch of event photos is tiled into a contact sheet, a multimodal model
//! picks the most engaging subset, a deterministic layout engine composes the
//! collage under a branded header, and a second model call scores it. The run
//! retries a bounded number of times and keeps the best-scoring collage.

#![forbid(unsafe_code)]

/// Layout table, placement policies and canvas rendering
pub mod compose;
/// Model calls for photo selection and impact scoring
pub mod inference;
/// Input/output operations and error handling
pub mod io;
/// Event inputs and the retry orchestrator
pub mod workflow;

pub use io::error::{CollageError, Result};
