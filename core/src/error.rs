//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The pipeline error enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`; `Pattern` must be built
/// explicitly since it carries soft-skip semantics.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A structural pattern or region marker was not found, or a candidate
    /// block could not be safely captured. Soft condition: the affected step
    /// is skipped or aborted without poisoning sibling steps.
    /// We ignore this for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Pattern Error: {_0}")]
    Pattern(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
