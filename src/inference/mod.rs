//! External multimodal model calls and reply parsing

/// Selection and scoring operations over a model seam
pub mod client;
/// Gemini REST implementation of the model seam
pub mod gemini;
/// Reply parsers
pub mod parse;

pub use client::{ImpactReport, VisionModel, score_collage, select_best};
