//! # Block Extractor
//!
//! Scans raw source text for structural declarations (a declaration keyword
//! plus a name suffix, e.g. `type FooParams struct { ... }`) and returns each
//! matched span verbatim.
//!
//! The body capture is flat: it runs from the `{` after the declaration header
//! to the next `}`, without tracking delimiter depth. A candidate body that
//! contains a nested `{` cannot be captured safely and is rejected with a
//! `Pattern` error rather than silently truncated.

use crate::error::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative matcher for one kind of structural block.
///
/// `keyword` is the declaration opener (`type` for Go sources), `suffix` the
/// trailing part of the declaration name (`Params`, `Row`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralPattern {
    /// Declaration keyword.
    pub keyword: String,
    /// Required name suffix.
    pub suffix: String,
}

impl StructuralPattern {
    /// Creates a pattern for `keyword <Name><suffix> struct { ... }` blocks.
    pub fn new(keyword: &str, suffix: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Compiles the flat-body regex for this pattern.
    ///
    /// The body group is `[^}]*`: everything up to the next closing brace,
    /// regardless of any opening brace in between. Nested-body detection is
    /// done on the capture afterwards.
    fn compile(&self) -> AppResult<Regex> {
        let source = format!(
            r"{kw}\s+(\w+{suffix})\s+struct\s*\{{([^}}]*)\}}",
            kw = regex::escape(&self.keyword),
            suffix = regex::escape(&self.suffix),
        );
        Regex::new(&source)
            .map_err(|e| AppError::General(format!("Invalid structural pattern: {}", e)))
    }
}

/// Immutable raw text of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path the unit was read from.
    pub path: PathBuf,
    /// Raw file contents.
    pub text: String,
}

impl SourceUnit {
    /// Wraps already-read text with its origin path.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads a unit from disk.
    pub fn read(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path, text))
    }
}

/// One structural declaration captured verbatim from a source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    /// The declaration name (e.g. `CreateUserParams`).
    pub name: String,
    /// The full matched span, header plus body.
    pub text: String,
    /// Path of the unit the block came from.
    pub unit: PathBuf,
    /// Discovery order within that unit (left-to-right).
    pub index: usize,
}

/// Extracts every block matching `pattern` from `unit`, in textual order.
///
/// Pure function of its inputs. Matching is non-overlapping and greedy per the
/// flat-body assumption; a body containing a nested `{` yields
/// `AppError::Pattern` naming the offending declaration.
pub fn extract_blocks(
    unit: &SourceUnit,
    pattern: &StructuralPattern,
) -> AppResult<Vec<ExtractedBlock>> {
    let re = pattern.compile()?;
    let mut blocks = Vec::new();

    for (index, caps) in re.captures_iter(&unit.text).enumerate() {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if body.contains('{') {
            return Err(AppError::Pattern(format!(
                "Declaration '{}' in {:?} has a nested brace-delimited body; \
                 flat-body extraction cannot capture it safely",
                name, unit.path
            )));
        }

        blocks.push(ExtractedBlock {
            name: name.to_string(),
            text: whole.as_str().to_string(),
            unit: unit.path.clone(),
            index,
        });
    }

    Ok(blocks)
}
