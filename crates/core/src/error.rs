//! Error types for Ascension operations.
//!
//! Two kinds of failure exist:
//!
//! - [`AscensionError`] is fatal to a whole run: the document source cannot be
//!   reached, the layout holds an invalid selector, an output sink fails.
//! - [`SkipReason`] describes why a single entity was dropped. It never aborts
//!   the run; the pipeline records it and moves on to the next entity.
//!
//! # Example
//!
//! ```rust
//! use ascension_core::{AscensionError, Result};
//!
//! fn listing_url(raw: &str) -> Result<url::Url> {
//!     url::Url::parse(raw).map_err(|e| AscensionError::InvalidUrl(e.to_string()))
//! }
//! # assert!(listing_url("not a url").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline-level failures.
///
/// Any of these aborts the run. Per-entity problems are reported through
/// [`SkipReason`] instead.
#[derive(Error, Debug)]
pub enum AscensionError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or unparsable markup.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The document source could not produce a page.
    ///
    /// Returned when the listing page or an entity page cannot be loaded.
    /// A partial dataset is never produced in this case.
    #[error("Document source unavailable for '{handle}': {source}")]
    SourceUnavailable {
        handle: String,
        #[source]
        source: Box<AscensionError>,
    },

    /// The listing page does not contain the members container.
    #[error("Listing page has no element matching '{selector}'")]
    ListingMissing { selector: String },

    /// A mirror handle that would resolve outside the mirror root.
    #[error("Handle leaves the mirror root: {0}")]
    InvalidHandle(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV sink/reader errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A dataset violates one of its structural invariants.
    ///
    /// Returned e.g. when an entity contributes zero or several rows to the
    /// leveled view, or when a CSV row carries an unknown level label.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Result type alias for AscensionError.
pub type Result<T> = std::result::Result<T, AscensionError>;

/// Why a single entity produced no record.
///
/// Returned by every per-entity extraction step. The entity is dropped in
/// full; no partial record is ever emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The name is one of the non-playable placeholders.
    #[error("'{0}' is a placeholder entity")]
    PlaceholderName(String),

    /// The name is on the configured exclusion list.
    #[error("'{0}' is excluded")]
    Excluded(String),

    /// The stat table has fewer genuine rows than there are levels.
    #[error("stat table has {found} of {expected} level rows")]
    IncompleteStats { found: usize, expected: usize },

    /// An expected element or attribute is absent from the page.
    #[error("missing {element}")]
    StructuralMissing { element: String },

    /// The release date text does not match `Month DD, YYYY<br>`.
    #[error("unrecognised release date '{text}'")]
    DateFormatMismatch { text: String },
}

impl SkipReason {
    /// Shorthand for [`SkipReason::StructuralMissing`].
    pub fn missing(element: impl Into<String>) -> Self {
        SkipReason::StructuralMissing { element: element.into() }
    }

    /// Stable short name of the variant, used for tallies.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::PlaceholderName(_) => "placeholder",
            SkipReason::Excluded(_) => "excluded",
            SkipReason::IncompleteStats { .. } => "incomplete",
            SkipReason::StructuralMissing { .. } => "missing",
            SkipReason::DateFormatMismatch { .. } => "date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AscensionError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_timeout_error() {
        let err = AscensionError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_source_unavailable_wraps_cause() {
        let err = AscensionError::SourceUnavailable {
            handle: "/wiki/Amber".to_string(),
            source: Box::new(AscensionError::Timeout { timeout: 5 }),
        };
        let msg = err.to_string();
        assert!(msg.contains("/wiki/Amber"));
        assert!(msg.contains("5 seconds"));
    }

    #[test]
    fn test_skip_reason_display() {
        let skip = SkipReason::IncompleteStats { found: 10, expected: 14 };
        assert_eq!(skip.to_string(), "stat table has 10 of 14 level rows");
        assert_eq!(skip.kind(), "incomplete");
        assert_eq!(SkipReason::missing("region link").to_string(), "missing region link");
    }
}
