//! Bounded select -> compose -> score loop keeping the best collage

use crate::compose::collage::CollageCompositor;
use crate::compose::thumbnail::compose_thumbnail_grid;
use crate::inference::client::{VisionModel, score_collage, select_best};
use crate::io::archive::PhotoAsset;
use crate::io::configuration::{
    MAX_ATTEMPTS, MAX_CONTACT_SHEET_PHOTOS, SUCCESS_THRESHOLD, THUMBNAIL_SIZE,
};
use crate::io::error::{
    CollageError, Result, WithContext, composition_error, validation_error,
};
use crate::io::image::{decode_all, decode_bytes, decode_thumbnails};
use crate::workflow::event::EventDetails;
use image::DynamicImage;
use tracing::{debug, info, warn};

/// Where the run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No attempt started
    Idle,
    /// Asking the model which photos to use
    Selecting,
    /// Drawing the collage
    Composing,
    /// Asking the model to score the collage
    Scoring,
    /// Attempt finished below the threshold; another attempt will run
    Retry,
    /// Finished with a retained collage
    Done,
    /// Aborted on a fatal error
    Failed,
}

/// One encoded collage and the photos it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageArtifact {
    /// JPEG bytes
    pub image_data: Vec<u8>,
    /// Names of the photos used, in placement order
    pub source_names: Vec<String>,
}

/// A collage together with its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Attempt that produced this collage (1-based)
    pub attempt: usize,
    /// The collage
    pub artifact: CollageArtifact,
    /// Parsed impact score
    pub score: f64,
    /// Scoring reply or fallback text
    pub feedback: String,
}

/// One collage run over a fixed photo set
///
/// Attempts run strictly one after another. Only the best-scoring candidate
/// is retained; ties keep the earlier attempt.
pub struct CollageRun<'a, M: VisionModel + ?Sized> {
    model: &'a M,
    photos: &'a [PhotoAsset],
    details: &'a EventDetails,
    logo: DynamicImage,
    compositor: CollageCompositor,
    max_attempts: usize,
    attempt: usize,
    state: RunState,
    contact_sheet: Option<Vec<u8>>,
    last_score: Option<f64>,
    best: Option<ScoredCandidate>,
}

impl<'a, M: VisionModel + ?Sized> CollageRun<'a, M> {
    /// Validate inputs and prepare a run
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `photos` is empty
    /// - `logo` is empty or cannot be decoded
    /// - fewer photos are available than `details.photo_count`
    /// - more photos are provided than one contact sheet can tile
    pub fn new(
        model: &'a M,
        photos: &'a [PhotoAsset],
        logo: &[u8],
        details: &'a EventDetails,
    ) -> Result<Self> {
        if photos.is_empty() {
            return Err(validation_error("photos", &"no photos were provided"));
        }
        if logo.is_empty() {
            return Err(validation_error("logo", &"a logo image is required"));
        }
        if photos.len() < details.photo_count {
            return Err(validation_error(
                "photo_count",
                &format!(
                    "a collage with {} photos was requested, but only {} were provided",
                    details.photo_count,
                    photos.len()
                ),
            ));
        }

        if photos.len() > MAX_CONTACT_SHEET_PHOTOS {
            return Err(validation_error(
                "photos",
                &format!(
                    "{} photos were provided, but at most {MAX_CONTACT_SHEET_PHOTOS} fit on one contact sheet",
                    photos.len()
                ),
            ));
        }

        let logo = decode_bytes("logo", logo)?;

        Ok(Self {
            model,
            photos,
            details,
            logo,
            compositor: CollageCompositor::default(),
            max_attempts: MAX_ATTEMPTS,
            attempt: 0,
            state: RunState::Idle,
            contact_sheet: None,
            last_score: None,
            best: None,
        })
    }

    /// Override the attempt budget (at least one)
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the compositor
    #[must_use]
    pub fn with_compositor(mut self, compositor: CollageCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Current state
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Attempts started so far
    pub const fn attempt(&self) -> usize {
        self.attempt
    }

    /// Attempt budget
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Score of the most recently completed attempt
    pub const fn last_score(&self) -> Option<f64> {
        self.last_score
    }

    /// Best candidate so far
    pub const fn best(&self) -> Option<&ScoredCandidate> {
        self.best.as_ref()
    }

    /// Whether the selection step is skipped because every photo is needed
    pub fn uses_all_photos(&self) -> bool {
        self.photos.len() <= self.details.photo_count
    }

    /// Run one full attempt
    ///
    /// Returns whether another attempt should follow. Once the run is done or
    /// failed this returns `Ok(false)` without doing anything.
    ///
    /// # Errors
    ///
    /// Returns an error (and moves to [`RunState::Failed`]) if selection or
    /// composition fails; scoring failures only lower the score
    pub fn execute_attempt(&mut self) -> Result<bool> {
        if matches!(self.state, RunState::Done | RunState::Failed) {
            return Ok(false);
        }

        self.attempt += 1;
        let attempt = self.attempt;
        let outcome = self.run_attempt(attempt);
        if let Err(error) = &outcome {
            warn!(attempt, %error, "collage run failed");
            self.state = RunState::Failed;
        }
        outcome
    }

    /// Run attempts until the loop stops, then return the best candidate
    ///
    /// # Errors
    ///
    /// Returns the first fatal error, or an error if no collage was produced
    pub fn run(mut self) -> Result<ScoredCandidate> {
        while self.execute_attempt()? {}
        self.finish()
    }

    /// Consume the run and return the retained candidate
    ///
    /// # Errors
    ///
    /// Returns an error if no attempt produced a collage
    pub fn finish(self) -> Result<ScoredCandidate> {
        self.best.ok_or_else(|| {
            composition_error("finish", &"could not generate a collage, please try again")
        })
    }

    fn run_attempt(&mut self, attempt: usize) -> Result<bool> {
        let count = self.details.photo_count;
        let max = self.max_attempts;

        self.state = RunState::Selecting;
        let chosen: Vec<&PhotoAsset> = if self.uses_all_photos() {
            info!(
                available = self.photos.len(),
                "Photo count is low ({}), using all available photos for the collage.",
                self.photos.len()
            );
            self.photos.iter().collect()
        } else {
            info!(attempt, "Attempt {attempt}/{max}: AI is selecting the best {count} photos...");
            self.select(attempt)?
        };

        self.state = RunState::Composing;
        info!(attempt, "Attempt {attempt}/{max}: Generating collage...");
        let images = decode_all(&chosen)?;
        let image_data = self
            .compositor
            .compose(&images, &self.logo, self.details)
            .with_stage("collage")?;
        let artifact = CollageArtifact {
            image_data,
            source_names: chosen.iter().map(|p| p.name.clone()).collect(),
        };

        self.state = RunState::Scoring;
        info!(attempt, "Attempt {attempt}/{max}: Performing virality check...");
        let report = score_collage(self.model, &artifact.image_data);
        let score = report.score;
        self.last_score = Some(score);
        debug!(attempt, score, degraded = report.degraded, "collage scored");

        if self.best.as_ref().is_none_or(|best| score > best.score) {
            self.best = Some(ScoredCandidate {
                attempt,
                artifact,
                score,
                feedback: report.feedback,
            });
        }

        if score > SUCCESS_THRESHOLD {
            info!(attempt, score, "Success! Achieved a high virality score of {score}/10.");
            self.state = RunState::Done;
            return Ok(false);
        }

        if self.uses_all_photos() || attempt >= max {
            let best = self.best.as_ref().map_or(score, |b| b.score);
            if attempt >= max {
                info!(
                    best,
                    "Completed all {max} attempts. Presenting the best result with a score of {best}/10."
                );
            }
            self.state = RunState::Done;
            return Ok(false);
        }

        info!(
            attempt,
            score,
            "Score was {score}/10. Rerunning to improve... (Attempt {}/{max})",
            attempt + 1
        );
        self.state = RunState::Retry;
        Ok(true)
    }

    fn select(&mut self, attempt: usize) -> Result<Vec<&'a PhotoAsset>> {
        let photos = self.photos;
        let count = self.details.photo_count;

        let sheet = match self.contact_sheet.take() {
            Some(sheet) => sheet,
            None => {
                let all: Vec<&PhotoAsset> = photos.iter().collect();
                let thumbnails = decode_thumbnails(&all, THUMBNAIL_SIZE)?;
                compose_thumbnail_grid(&thumbnails).with_stage("thumbnail grid")?
            }
        };

        let names: Vec<String> = photos.iter().map(|p| p.name.clone()).collect();
        let selection = select_best(self.model, &sheet, &names, count, &self.details.title)
            .with_attempt(attempt);
        self.contact_sheet = Some(sheet);
        let selected = selection?;

        if selected.len() < count {
            return Err(CollageError::Selection {
                attempt,
                reason: format!(
                    "AI could only select {} unique photos. Please try again with a different set of images.",
                    selected.len()
                ),
            });
        }

        // Archive order decides both membership and placement
        Ok(photos
            .iter()
            .filter(|p| selected.contains(&p.name))
            .take(count)
            .collect())
    }
}
