//! The collage workflow: event inputs and the retry orchestrator

/// Event details supplied by the caller
pub mod event;
/// Retry orchestrator
pub mod orchestrator;

pub use event::{EventDetails, HeaderColor};
pub use orchestrator::{CollageArtifact, CollageRun, RunState, ScoredCandidate};
