//! Byte-range text edits over an immutable source buffer
//!
//! Edits never mutate the original text; [`apply_edits`] builds a new
//! buffer from the untouched spans and the replacement texts.

use std::ops::Range;

use crate::parser::types::ResolvedUpdate;

/// Replace `range` (byte offsets into the original text) with `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(range: Range<usize>, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::replace(offset..offset, new_text)
    }
}

/// A line whose content differs between two versions of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    /// Line number (1-indexed)
    pub line: usize,
    pub before: String,
    pub after: String,
}

/// Edits that move a reference to its new commit and version
///
/// The hash is replaced in place. An existing version comment is replaced;
/// otherwise ` # <tag>` is inserted directly after the pin.
pub fn edits_for(update: &ResolvedUpdate) -> Vec<TextEdit> {
    let reference = &update.reference;
    let hash_edit = TextEdit::replace(reference.hash_range.clone(), &update.new_commit_hash);

    let version_edit = match &reference.version_range {
        Some(range) => TextEdit::replace(range.clone(), &update.new_version),
        None => TextEdit::insert(reference.insert_offset, format!(" # {}", update.new_version)),
    };

    vec![hash_edit, version_edit]
}

/// Apply `edits` to `original`, returning the new text
///
/// Returns None if any edit is out of bounds, splits a character, or
/// overlaps another edit.
pub fn apply_edits(original: &str, edits: &[TextEdit]) -> Option<String> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.range.start, e.range.end));

    let mut result = String::with_capacity(original.len());
    let mut cursor = 0;

    for edit in sorted {
        if edit.range.start < cursor || edit.range.start > edit.range.end {
            return None;
        }
        result.push_str(original.get(cursor..edit.range.start)?);
        original.get(edit.range.clone())?;
        result.push_str(&edit.new_text);
        cursor = edit.range.end;
    }

    result.push_str(original.get(cursor..)?);
    Some(result)
}

/// Lines that differ between `before` and `after`
///
/// Assumes both texts have the same number of lines, which holds for edits
/// that do not add or remove line breaks.
pub fn diff_lines(before: &str, after: &str) -> Vec<LineChange> {
    before
        .lines()
        .zip(after.lines())
        .enumerate()
        .filter(|(_, (b, a))| b != a)
        .map(|(i, (b, a))| LineChange {
            line: i + 1,
            before: b.to_string(),
            after: a.to_string(),
        })
        .collect()
}
