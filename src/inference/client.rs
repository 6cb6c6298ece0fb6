//! Selection and scoring operations over any vision-capable model

use crate::inference::parse::{parse_filename_list, parse_impact_score};
use crate::io::configuration::SCORING_FALLBACK_TEXT;
use crate::io::error::{Result, selection_error};

/// A multimodal model that answers one text prompt about one JPEG image
///
/// Implementations are expected to be slow and fallible; callers decide how
/// failures are treated.
pub trait VisionModel {
    /// Send `prompt` with `jpeg` attached and return the reply text
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply carries no text
    fn generate(&self, prompt: &str, jpeg: &[u8]) -> Result<String>;
}

impl<M: VisionModel + ?Sized> VisionModel for &M {
    fn generate(&self, prompt: &str, jpeg: &[u8]) -> Result<String> {
        (**self).generate(prompt, jpeg)
    }
}

/// Outcome of a scoring call
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactReport {
    /// Parsed score, 0 when absent or when the call failed
    pub score: f64,
    /// Reply text shown to the user
    pub feedback: String,
    /// Whether the call failed and the fallback text was substituted
    pub degraded: bool,
}

/// Instruction sent with the contact sheet
pub fn selection_prompt(event_title: &str, candidates: &[String], count: usize) -> String {
    format!(
        "You are a social media expert for the event \"{event_title}\". From this grid of photos, \
         select the {count} best images that are engaging, clear, and tell a story. Focus on \
         photos with clear subjects, good composition, and emotional impact. The grid reads left \
         to right, top to bottom, and the filenames for the images in that order are: {}. Your \
         response MUST be ONLY a comma-separated list of the selected filenames, with no extra \
         text or formatting.",
        candidates.join(", ")
    )
}

/// Instruction sent with a finished collage
pub const SCORING_PROMPT: &str = "You are a professional graphic designer and social media \
    marketing expert. Analyze this collage for its design quality and potential to go viral. \
    Provide a single combined \"Impact Score\" from 1 to 10. In your 3-4 sentence justification, \
    comment on its professional appearance, layout, composition, and its potential for social \
    media engagement. Format your response exactly like this: \
    \"Impact Score: [score]/10. [Justification]\"";

/// Ask the model for the best `count` photos in a contact sheet
///
/// Names the model invents are discarded. The caller checks whether enough
/// names survived.
///
/// # Errors
///
/// Returns a selection error if the call fails or no valid name survives
pub fn select_best<M: VisionModel + ?Sized>(
    model: &M,
    grid_jpeg: &[u8],
    candidates: &[String],
    count: usize,
    event_title: &str,
) -> Result<Vec<String>> {
    let prompt = selection_prompt(event_title, candidates, count);
    let reply = model
        .generate(&prompt, grid_jpeg)
        .map_err(|e| selection_error(&e))?;

    let selected = parse_filename_list(&reply, candidates);
    tracing::debug!(requested = count, valid = selected.len(), "parsed selection reply");

    if selected.is_empty() {
        return Err(selection_error(
            &"AI model did not return any valid filenames",
        ));
    }
    Ok(selected)
}

/// Ask the model to score a finished collage
///
/// Never fails: a failed call yields the fallback text and a zero score, and an
/// unparseable reply yields a zero score with the reply kept as feedback.
pub fn score_collage<M: VisionModel + ?Sized>(model: &M, collage_jpeg: &[u8]) -> ImpactReport {
    match model.generate(SCORING_PROMPT, collage_jpeg) {
        Ok(reply) => ImpactReport {
            score: parse_impact_score(&reply),
            feedback: reply,
            degraded: false,
        },
        Err(error) => {
            tracing::warn!(%error, "impact check failed, scoring as 0");
            ImpactReport {
                score: parse_impact_score(SCORING_FALLBACK_TEXT),
                feedback: SCORING_FALLBACK_TEXT.to_string(),
                degraded: true,
            }
        }
    }
}
