//! Applying suggested fixes to source text
//!
//! - Safe-by-default fix application (`Applicability::Always`)
//! - Overlapping fixes are detected and only the first one (in source order) is kept
//! - Fixes are applied back to front so earlier offsets stay valid
//! - Unified diff preview via `similar`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TaglintError;
use crate::result::Result;
use crate::{Applicability, CodeSuggestion, Diagnostic, Location};

/// Represents a fix that can be applied to source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Identifier built from the rule id and position
    pub id: String,
    /// Description of what this fix does
    pub description: String,
    /// Location where the fix should be applied
    pub location: Location,
    /// The replacement text
    pub replacement: String,
    /// Applicability level (Always = safe, MaybeIncorrect = unsafe)
    pub applicability: Applicability,
    /// Rule ID that generated this fix
    pub rule_id: String,
}

/// Outcome of applying fixes to one file's content
#[derive(Debug, Clone, Default)]
pub struct FixResult {
    pub content: String,
    pub applied_count: usize,
    /// Ids of the applied fixes, in source order
    pub applied: Vec<String>,
    /// Fixes dropped because they overlap an earlier fix
    pub skipped_count: usize,
    pub errors: Vec<String>,
}

impl Fix {
    /// Create a new fix from a CodeSuggestion
    pub fn from_code_suggestion(suggestion: &CodeSuggestion, diagnostic: &Diagnostic) -> Self {
        Self {
            id: format!("{}@{}", diagnostic.rule_id, suggestion.location.offset),
            description: suggestion.message.clone(),
            location: suggestion.location.clone(),
            replacement: suggestion.replacement.clone(),
            applicability: suggestion.applicability,
            rule_id: diagnostic.rule_id.clone(),
        }
    }

    /// Collect every suggestion in `diagnostics` as a fix
    pub fn collect(diagnostics: &[Diagnostic], include_unsafe: bool) -> Vec<Fix> {
        diagnostics
            .iter()
            .flat_map(|d| d.suggestions.iter().map(move |s| Fix::from_code_suggestion(s, d)))
            .filter(|fix| include_unsafe || fix.is_safe())
            .collect()
    }

    /// Check if this fix is safe to apply automatically
    pub fn is_safe(&self) -> bool {
        matches!(self.applicability, Applicability::Always)
    }

    /// Check if this fix conflicts with another fix
    pub fn conflicts_with(&self, other: &Fix) -> bool {
        if self.location.file != other.location.file {
            return false;
        }

        let (self_start, self_end) = self.span();
        let (other_start, other_end) = other.span();

        !(self_end <= other_start || other_end <= self_start)
    }

    /// Get the span of this fix as (start, end) byte offsets
    pub fn span(&self) -> (usize, usize) {
        (
            self.location.offset,
            self.location.offset + self.location.length,
        )
    }
}

/// Apply `fixes` to `content`
///
/// Fixes are taken in source order; one that overlaps an already accepted fix is
/// skipped. A fix whose span falls outside `content` or off a character boundary is
/// recorded as an error and not applied.
pub fn apply_fixes(content: &str, fixes: &[Fix]) -> FixResult {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by_key(|fix| fix.span());

    let mut accepted: Vec<&Fix> = Vec::new();
    let mut skipped_count = 0;
    for fix in ordered {
        if accepted.iter().any(|kept| kept.conflicts_with(fix)) {
            tracing::debug!("Skipping conflicting fix {}", fix.id);
            skipped_count += 1;
            continue;
        }
        accepted.push(fix);
    }

    let mut modified = content.to_string();
    let mut applied = Vec::new();
    let mut errors = Vec::new();
    for fix in accepted.into_iter().rev() {
        match apply_single_fix(&mut modified, fix) {
            Ok(()) => applied.push(fix.id.clone()),
            Err(e) => errors.push(format!("Fix {}: {}", fix.id, e)),
        }
    }
    applied.reverse();

    FixResult {
        content: modified,
        applied_count: applied.len(),
        applied,
        skipped_count,
        errors,
    }
}

fn apply_single_fix(content: &mut String, fix: &Fix) -> Result<()> {
    let (start, end) = fix.span();

    if end > content.len() || !content.is_char_boundary(start) || !content.is_char_boundary(end)
    {
        return Err(TaglintError::autofix_error(format!(
            "Fix {} has invalid bounds {start}..{end}",
            fix.id
        )));
    }

    content.replace_range(start..end, &fix.replacement);
    Ok(())
}

/// Generate a unified diff between original and modified content
pub fn generate_unified_diff(original: &str, modified: &str, file_path: &Path) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    output.push_str(&format!("--- {}\n", file_path.display()));
    output.push_str(&format!("+++ {} (fixed)\n", file_path.display()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }

        let old_line = group[0].old_range().start;
        let new_line = group[0].new_range().start;
        let old_len = group.iter().map(|op| op.old_range().len()).sum::<usize>();
        let new_len = group.iter().map(|op| op.new_range().len()).sum::<usize>();

        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_line + 1,
            old_len,
            new_line + 1,
            new_len
        ));

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                let line_text = change.value();
                output.push_str(&format!("{sign}{line_text}"));
                if !line_text.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}
