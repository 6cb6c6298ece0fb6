//! Error types and context management for collage workflow operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all collage workflow operations
#[derive(Debug)]
pub enum CollageError {
    /// Workflow inputs are missing or inconsistent; no attempt is made
    Validation {
        /// Name of the offending input
        field: &'static str,
        /// Explanation of why the input was rejected
        reason: String,
    },

    /// The photo bundle could not be parsed as an archive
    ArchiveFormat {
        /// Underlying archive error
        source: zip::result::ZipError,
    },

    /// A single archive entry could not be read
    ArchiveEntry {
        /// Name (or index) of the entry inside the archive
        entry: String,
        /// Underlying read error
        source: std::io::Error,
    },

    /// Photo selection failed or produced too few candidates
    Selection {
        /// Attempt number when this occurred (1-based, 0 when unknown)
        attempt: usize,
        /// Description of the failure
        reason: String,
    },

    /// A photo or logo could not be decoded
    ImageDecode {
        /// Name of the image that failed
        name: String,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// A composed canvas could not be encoded
    ImageEncode {
        /// Underlying encoder error
        source: image::ImageError,
    },

    /// Canvas construction failed for a reason other than decoding
    Composition {
        /// Compositing stage that failed
        stage: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// The inference service call failed
    ///
    /// Never escapes the workflow on its own: selection turns it into
    /// [`CollageError::Selection`] and scoring degrades it to a zero score.
    Inference {
        /// HTTP status if the service answered
        status: Option<u16>,
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Coarse classification matching the workflow's error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing inputs
    Validation,
    /// Malformed photo archive
    Extraction,
    /// Selection step failed
    Selection,
    /// Decoding, drawing or encoding failed
    Composition,
    /// Inference transport failure
    Inference,
    /// Disk I/O outside the workflow
    FileSystem,
}

impl CollageError {
    /// Taxonomy bucket for this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::ArchiveFormat { .. } | Self::ArchiveEntry { .. } => ErrorKind::Extraction,
            Self::Selection { .. } => ErrorKind::Selection,
            Self::ImageDecode { .. } | Self::ImageEncode { .. } | Self::Composition { .. } => {
                ErrorKind::Composition
            }
            Self::Inference { .. } => ErrorKind::Inference,
            Self::FileSystem { .. } => ErrorKind::FileSystem,
        }
    }
}

impl fmt::Display for CollageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, reason } => {
                write!(f, "Invalid input '{field}': {reason}")
            }
            Self::ArchiveFormat { source } => {
                write!(f, "Could not read the zip file: {source}")
            }
            Self::ArchiveEntry { entry, source } => {
                write!(f, "Could not extract archive entry '{entry}': {source}")
            }
            Self::Selection { attempt, reason } => {
                if *attempt == 0 {
                    write!(f, "AI photo selection failed: {reason}")
                } else {
                    write!(f, "AI photo selection failed on attempt {attempt}: {reason}")
                }
            }
            Self::ImageDecode { name, source } => {
                write!(f, "Failed to load image '{name}': {source}")
            }
            Self::ImageEncode { source } => {
                write!(f, "Failed to encode collage: {source}")
            }
            Self::Composition { stage, reason } => {
                write!(f, "Composition error during {stage}: {reason}")
            }
            Self::Inference { status, reason } => match status {
                Some(code) => write!(f, "Inference service error ({code}): {reason}"),
                None => write!(f, "Inference service error: {reason}"),
            },
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CollageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ArchiveFormat { source } => Some(source),
            Self::ImageDecode { source, .. } | Self::ImageEncode { source } => Some(source),
            Self::ArchiveEntry { source, .. } | Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for workflow results
pub type Result<T> = std::result::Result<T, CollageError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Current attempt number
    pub attempt: Option<usize>,
    /// Compositing stage being performed
    pub stage: Option<&'static str>,
}

/// Enriches error messages with workflow state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the attempt context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the attempt number applied
    fn with_attempt(self, attempt: usize) -> Result<T>;

    /// Add just the stage context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the stage applied
    fn with_stage(self, stage: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<CollageError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                CollageError::Selection { attempt, .. } => {
                    if let Some(current) = context.attempt {
                        *attempt = current;
                    }
                }
                CollageError::Composition { stage, .. } => {
                    if let Some(current) = context.stage {
                        *stage = current;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_attempt(self, attempt: usize) -> Result<T> {
        self.with_context(ErrorContext {
            attempt: Some(attempt),
            ..Default::default()
        })
    }

    fn with_stage(self, stage: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            stage: Some(stage),
            ..Default::default()
        })
    }
}

impl From<image::ImageError> for CollageError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageDecode {
            name: "<unknown>".to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for CollageError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<zip::result::ZipError> for CollageError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::ArchiveFormat { source: err }
    }
}

impl From<reqwest::Error> for CollageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Inference {
            status: err.status().map(|s| s.as_u16()),
            reason: err.to_string(),
        }
    }
}

/// Create a validation error
pub fn validation_error(field: &'static str, reason: &impl ToString) -> CollageError {
    CollageError::Validation {
        field,
        reason: reason.to_string(),
    }
}

/// Create a composition error
pub fn composition_error(stage: &'static str, reason: &impl ToString) -> CollageError {
    CollageError::Composition {
        stage,
        reason: reason.to_string(),
    }
}

/// Create a selection error with no attempt recorded yet
pub fn selection_error(reason: &impl ToString) -> CollageError {
    CollageError::Selection {
        attempt: 0,
        reason: reason.to_string(),
    }
}
