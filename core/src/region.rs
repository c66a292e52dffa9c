#![deny(missing_docs)]

//! # Delimited Region Replacer
//!
//! Locates a named region in a foreign artifact via a start-marker pattern
//! whose match ends at an opening `{`, scans forward with a delimiter depth
//! counter to find the true closing `}`, and substitutes new content for the
//! whole span.
//!
//! Unlike the flat-body extractor, this scan is depth-aware: the region it
//! targets legitimately contains nested brace-delimited structures. Known
//! boundary: brace characters inside string or comment literals are counted
//! like structural braces and will desynchronize the depth counter.

use crate::error::{AppError, AppResult};
use regex::Regex;

/// Replaces the first marker-opened region of `source` with `replacement`.
///
/// `marker` must match the region opener up to and including its `{`
/// (e.g. `export\s+namespace\s+pgtype\s*\{`). The replaced span runs from the
/// marker's start to the balanced closing brace inclusive, and becomes
/// `opener + '\n' + replacement + '\n' + '}'` where `opener` is the literal
/// marker match.
///
/// Returns `Ok(None)` when the marker is absent — a soft no-op the caller
/// reports without failing sibling steps — and `Ok(Some(new_text))` when the
/// region was found and rewritten.
pub fn replace_region(
    source: &str,
    marker: &Regex,
    replacement: &str,
) -> AppResult<Option<String>> {
    let Some(m) = marker.find(source) else {
        return Ok(None);
    };

    if !m.as_str().trim_end().ends_with('{') {
        return Err(AppError::General(format!(
            "Region marker '{}' does not end at an opening delimiter",
            marker.as_str()
        )));
    }

    // Depth starts at 1: the marker consumed the region's opening brace.
    let mut depth: usize = 1;
    let mut end = None;
    for (offset, ch) in source[m.end()..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(m.end() + offset + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let end = end.ok_or_else(|| {
        AppError::Pattern(format!(
            "Region opened by '{}' never closes; unbalanced delimiters",
            m.as_str().trim_end()
        ))
    })?;

    let mut out = String::with_capacity(source.len() + replacement.len());
    out.push_str(&source[..m.start()]);
    out.push_str(m.as_str());
    out.push('\n');
    out.push_str(replacement);
    out.push('\n');
    out.push('}');
    out.push_str(&source[end..]);

    Ok(Some(out))
}
