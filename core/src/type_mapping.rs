#![deny(missing_docs)]

//! # Type Mapping
//!
//! The substitution engine that rewrites storage-library wrapper types into
//! plain scalar equivalents inside extracted block text.
//!
//! Two independent, composable passes:
//! 1. a namespace-qualifier remap (`pgtype.` → `db.`, or a bare strip), and
//! 2. a scalar table applied as a single alternation over the whole block.
//!
//! The qualifier pass always runs first: scalar entries are expressed in
//! unqualified form. The scalar pass is identifier-boundary-aware and matches
//! all entries in one sweep, so a replacement target is never rescanned — a
//! table holding both `Time` and `Timestamptz` cannot corrupt either token.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Unconditional namespace-qualifier rewrite, e.g. `pgtype.` → `db.`.
///
/// An empty `to` strips the qualifier entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifierRemap {
    /// Qualifier to replace, including the trailing separator (`pgtype.`).
    pub from: String,
    /// Replacement text (`db.`, or empty to strip).
    pub to: String,
}

impl QualifierRemap {
    /// Creates a remap pair.
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Applies the remap as a literal replacement across the text.
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.from, &self.to)
    }
}

/// Ordered (sourceToken → targetToken) substitution table.
///
/// Entries keep insertion order for round-tripping through config files, but
/// application order is length-descending with word boundaries on both sides,
/// so overlapping tokens (`Time` / `Timestamp` / `Timestamptz`) never collide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    /// The substitution pairs.
    pub entries: IndexMap<String, String>,
}

impl TypeTable {
    /// Builds a table from (source, target) pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(s, t)| (s.to_string(), t.to_string()))
                .collect(),
        }
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compiles the single-sweep alternation matcher.
    ///
    /// Alternatives are sorted longest-first so the leftmost-first regex
    /// engine prefers `Timestamptz` over `Timestamp` at the same position.
    fn matcher(&self) -> AppResult<Regex> {
        let mut sources: Vec<&String> = self.entries.keys().collect();
        sources.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = sources
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&format!(r"\b(?:{})\b", alternation))
            .map_err(|e| AppError::General(format!("Invalid mapping table: {}", e)))
    }
}

/// Applies a qualifier remap and/or a scalar table to block text.
///
/// Pure text-in/text-out; knows nothing about the surrounding declaration
/// syntax.
#[derive(Debug, Clone)]
pub struct Projector {
    remap: Option<QualifierRemap>,
    table: IndexMap<String, String>,
    matcher: Option<Regex>,
}

impl Projector {
    /// Builds a projector, compiling the table matcher once up front.
    pub fn new(remap: Option<QualifierRemap>, table: Option<&TypeTable>) -> AppResult<Self> {
        let (entries, matcher) = match table {
            Some(t) if !t.is_empty() => (t.entries.clone(), Some(t.matcher()?)),
            _ => (IndexMap::new(), None),
        };
        Ok(Self {
            remap,
            table: entries,
            matcher,
        })
    }

    /// A projector that leaves text untouched.
    pub fn identity() -> Self {
        Self {
            remap: None,
            table: IndexMap::new(),
            matcher: None,
        }
    }

    /// Rewrites block text: qualifier pass first, scalar sweep second.
    pub fn project(&self, text: &str) -> String {
        let resolved = match &self.remap {
            Some(remap) => remap.apply(text),
            None => text.to_string(),
        };

        match &self.matcher {
            Some(re) => re
                .replace_all(&resolved, |caps: &regex::Captures| {
                    let token = caps.get(0).expect("capture 0 always present").as_str();
                    self.table
                        .get(token)
                        .cloned()
                        .unwrap_or_else(|| token.to_string())
                })
                .into_owned(),
            None => resolved,
        }
    }

}
