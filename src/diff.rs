//! Span-based text diffs and their line-oriented rendering
//!
//! The diff algorithm is pluggable: anything implementing [`SpanDiffer`]
//! turns two texts into an ordered list of equal, insert and delete
//! [`Span`]s that together cover both texts. [`SimilarDiffer`] is the default
//! implementation, backed by the `similar` crate.
//!
//! [`format_diff`] renders spans independently of the algorithm that produced
//! them. It keeps a running line counter for each side; every non-equal span
//! becomes a [`Hunk`] with a header naming the affected lines on both sides,
//! followed by the touched lines prefixed `<` (old side) or `>` (new side).
//!
//! ## Example
//!
//! ```text
//!
//! /dump/2017/0415/0036/NEWAGE/notes:2,2 /dump/2017/0416/0036/NEWAGE/notes:2,2
//! <two
//!
//! /dump/2017/0415/0036/NEWAGE/notes:3,3 /dump/2017/0416/0036/NEWAGE/notes:2,2
//! >deux
//! ```

use crate::snapshot::Signature;
use crate::types::DiffUnit;
use serde::Serialize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a diff span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// Present in both texts
    Equal,
    /// Only in the new text
    Insert,
    /// Only in the old text
    Delete,
}

/// A run of text with a single kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// What happened to the text
    pub kind: SpanKind,
    /// The text itself, line breaks included
    pub text: String,
}

impl Span {
    /// Create a span
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A text diff algorithm
pub trait SpanDiffer {
    /// Ordered spans aligning `old` with `new`
    fn spans(&self, old: &str, new: &str) -> Vec<Span>;
}

/// [`SpanDiffer`] backed by `similar`'s Myers implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarDiffer {
    unit: DiffUnit,
}

impl SimilarDiffer {
    /// Create a differ working on the given unit
    pub fn new(unit: DiffUnit) -> Self {
        Self { unit }
    }
}

impl SpanDiffer for SimilarDiffer {
    fn spans(&self, old: &str, new: &str) -> Vec<Span> {
        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers);
        let diff = match self.unit {
            DiffUnit::Lines => config.diff_lines(old, new),
            DiffUnit::Words => config.diff_words(old, new),
            DiffUnit::Chars => config.diff_chars(old, new),
        };

        let mut spans: Vec<Span> = Vec::new();
        for change in diff.iter_all_changes() {
            let kind = match change.tag() {
                ChangeTag::Equal => SpanKind::Equal,
                ChangeTag::Insert => SpanKind::Insert,
                ChangeTag::Delete => SpanKind::Delete,
            };
            match spans.last_mut() {
                Some(last) if last.kind == kind => last.text.push_str(change.value()),
                _ => spans.push(Span::new(kind, change.value())),
            }
        }
        spans
    }
}

/// One changed region of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    /// Insert or delete
    pub kind: SpanKind,
    /// Old file path
    pub old_path: PathBuf,
    /// First and last affected line on the old side (1-based)
    pub old_lines: (usize, usize),
    /// New file path
    pub new_path: PathBuf,
    /// First and last affected line on the new side (1-based)
    pub new_lines: (usize, usize),
    /// Touched lines, without prefix
    pub lines: Vec<String>,
}

impl Hunk {
    fn prefix(&self) -> char {
        match self.kind {
            SpanKind::Delete => '<',
            _ => '>',
        }
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}:{},{} {}:{},{}",
            self.old_path.display(),
            self.old_lines.0,
            self.old_lines.1,
            self.new_path.display(),
            self.new_lines.0,
            self.new_lines.1
        )?;
        for line in &self.lines {
            writeln!(f, "{}{}", self.prefix(), line)?;
        }
        Ok(())
    }
}

/// Number of lines a span touches
///
/// A span without line breaks is an edit within a single line. Otherwise the
/// line after the last break only counts if the span reaches into it.
fn touched_lines(text: &str, breaks: usize) -> usize {
    if breaks == 0 {
        1
    } else if text.ends_with('\n') {
        breaks
    } else {
        breaks + 1
    }
}

fn take_lines(lines: &[String], start: usize, count: usize) -> Vec<String> {
    lines.iter().skip(start).take(count).cloned().collect()
}

/// Render spans comparing `old` with `new` as hunks
pub fn format_diff(spans: &[Span], old: &Signature, new: &Signature) -> Vec<Hunk> {
    format_spans(spans, old.path(), old.lines(), new.path(), new.lines())
}

/// [`format_diff`] over raw paths and line vectors
pub fn format_spans(
    spans: &[Span],
    old_path: &Path,
    old_lines: &[String],
    new_path: &Path,
    new_lines: &[String],
) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut left = 0usize;
    let mut right = 0usize;

    for span in spans.iter().filter(|s| !s.text.is_empty()) {
        let breaks = span.text.matches('\n').count();
        let touched = touched_lines(&span.text, breaks);
        match span.kind {
            SpanKind::Equal => {
                left += breaks;
                right += breaks;
            }
            SpanKind::Delete => {
                hunks.push(Hunk {
                    kind: SpanKind::Delete,
                    old_path: old_path.to_path_buf(),
                    old_lines: (left + 1, left + touched),
                    new_path: new_path.to_path_buf(),
                    new_lines: (right + 1, right + 1),
                    lines: take_lines(old_lines, left, touched),
                });
                left += breaks;
            }
            SpanKind::Insert => {
                hunks.push(Hunk {
                    kind: SpanKind::Insert,
                    old_path: old_path.to_path_buf(),
                    old_lines: (left + 1, left + 1),
                    new_path: new_path.to_path_buf(),
                    new_lines: (right + 1, right + touched),
                    lines: take_lines(new_lines, right, touched),
                });
                right += breaks;
            }
        }
    }

    hunks
}
