//! Command-line interface: load inputs, run the collage workflow, write results

use crate::inference::client::VisionModel;
use crate::inference::gemini::{GeminiClient, GeminiConfig};
use crate::io::archive::extract_photos;
use crate::io::configuration::{
    API_KEY_ENV, COLLAGE_EXTENSION, DEFAULT_HEADER_COLOR, DEFAULT_MODEL, DEFAULT_OUTPUT_STEM,
    DEFAULT_PHOTO_COUNT, FEEDBACK_EXTENSION, MAX_ATTEMPTS,
};
use crate::io::error::{CollageError, Result, validation_error};
use crate::io::logging::Verbosity;
use crate::io::progress::ProgressManager;
use crate::workflow::event::EventDetails;
use crate::workflow::orchestrator::{CollageRun, ScoredCandidate};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "collagist")]
#[command(
    author,
    version,
    about = "Build an AI-curated social media collage from a zip of event photos"
)]
/// Command-line arguments for the collage tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Zip archive of event photos
    #[arg(value_name = "PHOTOS_ZIP")]
    pub archive: PathBuf,

    /// Logo image placed in the header
    #[arg(short, long)]
    pub logo: PathBuf,

    /// Event or school name shown in the header
    #[arg(short, long)]
    pub title: String,

    /// Event date as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Header band color as #RRGGBB or #RGB
    #[arg(short = 'c', long, default_value = DEFAULT_HEADER_COLOR)]
    pub header_color: String,

    /// Number of photos in the collage
    #[arg(short = 'n', long, default_value_t = DEFAULT_PHOTO_COUNT)]
    pub photos: usize,

    /// Output path without extension; .jpg and .txt are written next to it
    #[arg(short, long, default_value = DEFAULT_OUTPUT_STEM)]
    pub output: PathBuf,

    /// Gemini API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for selection and scoring
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum select/compose/score attempts
    #[arg(short = 'a', long, default_value_t = MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Suppress progress and status output
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Overwrite existing output files
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Logging level implied by the flags; quiet wins over verbose
    pub const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Where the collage is written
    pub fn collage_path(&self) -> PathBuf {
        self.output.with_extension(COLLAGE_EXTENSION)
    }

    /// Where the feedback text is written
    pub fn feedback_path(&self) -> PathBuf {
        self.output.with_extension(FEEDBACK_EXTENSION)
    }

    /// Event details from the flags
    ///
    /// # Errors
    ///
    /// Returns an error if the date, color or photo count is invalid
    pub fn event_details(&self) -> Result<EventDetails> {
        let date = self.date.clone().unwrap_or_else(|| {
            chrono::Local::now()
                .date_naive()
                .format("%Y-%m-%d")
                .to_string()
        });
        EventDetails::parse(&self.title, &date, &self.header_color, self.photos)
    }
}

/// Reads inputs, drives the collage run with progress, writes the outputs
pub struct CollageProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CollageProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run against the Gemini API
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, inputs cannot be read, or
    /// the workflow fails
    pub fn process(&mut self) -> Result<()> {
        let api_key = self
            .cli
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                validation_error(
                    "api_key",
                    &format!("pass --api-key or set {API_KEY_ENV}"),
                )
            })?;

        let mut config = GeminiConfig::new(api_key);
        config.model.clone_from(&self.cli.model);
        let client = GeminiClient::new(config)?;
        self.process_with_model(&client)
    }

    /// Run against any model implementation
    ///
    /// # Errors
    ///
    /// Returns an error if inputs cannot be read, validation fails, selection
    /// or composition fails, or the outputs cannot be written
    pub fn process_with_model<M: VisionModel + ?Sized>(&mut self, model: &M) -> Result<()> {
        let collage_path = self.cli.collage_path();
        let feedback_path = self.cli.feedback_path();

        if self.cli.skip_existing() && collage_path.exists() {
            warn!(
                path = %collage_path.display(),
                "Skipping: output exists (pass --no-skip to overwrite)"
            );
            return Ok(());
        }

        let details = self.cli.event_details()?;

        info!(archive = %self.cli.archive.display(), "Unzipping photos...");
        let bundle = read_file(&self.cli.archive)?;
        let photos = extract_photos(&bundle)?;
        info!("Successfully loaded {} photos.", photos.len());

        let logo = read_file(&self.cli.logo)?;

        let mut run =
            CollageRun::new(model, &photos, &logo, &details)?.with_max_attempts(self.cli.max_attempts);
        let max_attempts = run.max_attempts();

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(max_attempts);
        }

        loop {
            if let Some(ref pm) = self.progress_manager {
                pm.start_attempt(run.attempt() + 1, max_attempts);
            }

            let should_continue = match run.execute_attempt() {
                Ok(should_continue) => should_continue,
                Err(error) => {
                    if let Some(ref pm) = self.progress_manager {
                        pm.abandon(&format!("An error occurred: {error}"));
                    }
                    return Err(error);
                }
            };

            if let (Some(pm), Some(score)) = (self.progress_manager.as_mut(), run.last_score()) {
                pm.complete_attempt(run.attempt(), score);
            }

            if !should_continue {
                break;
            }
        }

        let best = run.finish()?;
        write_outputs(&best, &collage_path, &feedback_path)?;

        if let Some(ref pm) = self.progress_manager {
            pm.finish(&format!(
                "Your collage is ready: {} (score {}/10)",
                collage_path.display(),
                best.score
            ));
        }
        info!(path = %collage_path.display(), score = best.score, "Collage written");

        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| CollageError::FileSystem {
        path: path.to_path_buf(),
        operation: "read",
        source: e,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CollageError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    std::fs::write(path, contents).map_err(|e| CollageError::FileSystem {
        path: path.to_path_buf(),
        operation: "write",
        source: e,
    })
}

/// Write the collage JPEG and its feedback text
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or a file cannot
/// be written
pub fn write_outputs(best: &ScoredCandidate, collage_path: &Path, feedback_path: &Path) -> Result<()> {
    write_file(collage_path, &best.artifact.image_data)?;
    write_file(feedback_path, best.feedback.as_bytes())
}
