//! Typed error handling for the rowset engine
//!
//! The engine distinguishes three classes of problems:
//!
//! - **Configuration errors** (unknown field ids, unknown filter operators,
//!   out-of-range pages) never fail an operation. They are recovered with a
//!   documented fallback and reported as [`ConfigWarning`] values.
//! - **Invariant violations** by the caller (duplicate record keys, more than
//!   one key in single selection mode) degrade gracefully and are also
//!   reported as [`ConfigWarning`] values.
//! - **Data errors** in saved views are rejected before they are stored and
//!   surface as [`ViewError`].
//!
//! # Example
//!
//! ```rust,ignore
//! match store.update("view-1", patch) {
//!     Ok(event) => notify(event),
//!     Err(RowsetError::View(ViewError::NotFound { id })) => {
//!         println!("View {} was removed meanwhile", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::record::RecordKey;
use serde::Serialize;
use thiserror::Error;

/// The main error type for the rowset engine
#[derive(Debug, Error)]
pub enum RowsetError {
    /// Saved view errors
    #[error(transparent)]
    View(#[from] ViewError),

    /// List configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON (de)serialization failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RowsetError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RowsetError::View(e) => e.error_code(),
            RowsetError::Config(e) => e.error_code(),
            RowsetError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

// =============================================================================
// View Errors
// =============================================================================

/// Errors related to saved view operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// No view with this id in the store
    #[error("View '{id}' not found")]
    NotFound { id: String },

    /// A view with this id is already stored
    #[error("View '{id}' already exists")]
    AlreadyExists { id: String },

    /// The view cannot be stored as-is
    #[error("Invalid view '{id}': {message}")]
    InvalidView { id: String, message: String },
}

impl ViewError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::NotFound { .. } => "VIEW_NOT_FOUND",
            ViewError::AlreadyExists { .. } => "VIEW_ALREADY_EXISTS",
            ViewError::InvalidView { .. } => "INVALID_VIEW",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to list configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// The configured default view is not among the saved views
    #[error("Default view '{id}' is not defined")]
    UnknownDefaultView { id: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_deref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::UnknownDefaultView { .. } => "UNKNOWN_DEFAULT_VIEW",
        }
    }
}

// =============================================================================
// Recovered configuration problems
// =============================================================================

/// Where an unknown field id was referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldUsage {
    Sort,
    Filter,
    Group,
    View,
}

/// A configuration problem the engine recovered from
///
/// Warnings never abort an operation; they are returned alongside the result
/// so callers can surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ConfigWarning {
    /// A sort, filter, group or view entry names a field that is not defined
    #[error("Unknown field '{field}' referenced by {usage:?}")]
    UnknownField { usage: FieldUsage, field: String },

    /// A filter uses an operator the engine does not implement; it is ignored
    #[error("Filter '{filter_id}' uses unknown operator '{operator}' and is ignored")]
    UnknownOperator { filter_id: String, operator: String },

    /// The requested page was outside `1..=total_pages`
    #[error("Page {requested} is out of range, showing page {clamped}")]
    PageClamped { requested: usize, clamped: usize },

    /// A page size of zero was requested
    #[error("Page size {requested} is invalid, using {used}")]
    PageSizeClamped { requested: usize, used: usize },

    /// Two records share a key; the last one wins
    #[error("Duplicate record key '{key}'")]
    DuplicateKey { key: RecordKey },

    /// More than one key was selected in single selection mode
    #[error("Single selection received {received} keys, kept the first")]
    SelectionTruncated { received: usize },
}

impl ConfigWarning {
    pub fn warning_code(&self) -> &'static str {
        match self {
            ConfigWarning::UnknownField { .. } => "UNKNOWN_FIELD",
            ConfigWarning::UnknownOperator { .. } => "UNKNOWN_OPERATOR",
            ConfigWarning::PageClamped { .. } => "PAGE_CLAMPED",
            ConfigWarning::PageSizeClamped { .. } => "PAGE_SIZE_CLAMPED",
            ConfigWarning::DuplicateKey { .. } => "DUPLICATE_KEY",
            ConfigWarning::SelectionTruncated { .. } => "SELECTION_TRUNCATED",
        }
    }
}
