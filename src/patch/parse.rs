//! Parse a patch into its structured form

use super::{Change, ChangeKind, ChangeType, Hunk, HunkHeader, HunkRange, Patch, PatchHeader};
use crate::utils::Lines;
use std::{borrow::Cow, fmt, iter::Peekable};

type Result<T, E = ParsePatchError> = std::result::Result<T, E>;

/// An error returned when parsing a patch fails
#[derive(Debug)]
pub struct ParsePatchError(Cow<'static, str>);

impl ParsePatchError {
    fn new<E: Into<Cow<'static, str>>>(e: E) -> Self {
        Self(e.into())
    }
}

impl fmt::Display for ParsePatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error parsing patch: {}", self.0)
    }
}

impl std::error::Error for ParsePatchError {}

pub(crate) fn parse(input: &str) -> Result<Patch<'_>> {
    let lines = Lines::split(input);
    let boundaries = hunk_boundaries(&lines);

    let header_end = boundaries.first().copied().unwrap_or(lines.len());
    let header = patch_header(&lines[..header_end], lines.raw(0..header_end))?;

    let mut hunks = Vec::with_capacity(boundaries.len());
    let mut from_no_newline = false;
    let mut to_no_newline = false;

    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(lines.len());
        let (hunk, markers) = hunk(&lines[start..end])?;

        // The flags describe the ends of the two files, so whichever hunk
        // reports them last is authoritative.
        if markers.any() {
            from_no_newline = markers.from;
            to_no_newline = markers.to;
        }

        hunks.push(hunk);
    }

    Ok(Patch {
        header,
        hunks,
        from_no_newline,
        to_no_newline,
    })
}

/// Locate the lines which begin a hunk, in input order
pub(crate) fn hunk_boundaries(lines: &[&str]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| line.starts_with("@@").then_some(idx))
        .collect()
}

/// Parse the header segment of a patch: the `diff --git` line plus every
/// extended header line before the first hunk.
pub(crate) fn patch_header<'a>(lines: &[&'a str], raw: &'a str) -> Result<PatchHeader<'a>> {
    let (from_path, to_path) = git_diff_paths(lines.first().copied().unwrap_or(""))?;

    let mut header = PatchHeader {
        raw,
        from_path: Some(from_path),
        to_path: Some(to_path),
        from_revision: "",
        to_revision: "",
        change_type: ChangeType::Modification,
        from_mode: None,
        to_mode: None,
        similarity: None,
        dissimilarity: None,
        is_binary: false,
    };

    let mut rest = lines.iter().skip(1).copied().peekable();
    while let Some(line) = rest.next() {
        directive(line, &mut rest, &mut header);
    }

    Ok(header)
}

// Line 0 of every patch: `diff --git a/<from> b/<to>`. The from side can
// itself contain ` b/`, so the split happens at the last occurrence.
fn git_diff_paths(line: &str) -> Result<(&str, &str)> {
    let invalid = || ParsePatchError::new("invalid patch header");

    let paths = line.strip_prefix("diff --git a/").ok_or_else(invalid)?;
    let split = paths.rfind(" b/").ok_or_else(invalid)?;

    Ok((&paths[..split], &paths[split + 3..]))
}

// One extended header line. The first token picks the directive, and the
// paired directives consume their partner from the following line.
fn directive<'a, I>(line: &'a str, rest: &mut Peekable<I>, header: &mut PatchHeader<'a>)
where
    I: Iterator<Item = &'a str>,
{
    match token(line, 0) {
        // "old mode <mode>" paired with "new mode <mode>"
        Some("old") => {
            header.from_mode = numeric(line, 2);
            if let Some(pair) = rest.next_if(|l| token(l, 0) == Some("new")) {
                header.to_mode = numeric(pair, 2);
            }
            header.change_type = ChangeType::Modification;
        }
        // "new file mode <mode>"
        Some("new") => {
            header.change_type = ChangeType::Addition;
            header.from_path = None;
            header.from_mode = None;
            header.to_mode = numeric(line, 3);
        }
        // "deleted file mode <mode>"
        Some("deleted") => {
            header.change_type = ChangeType::Deletion;
            header.from_mode = numeric(line, 3);
            header.to_path = None;
            header.to_mode = None;
        }
        // "copy from <path>" paired with "copy to <path>"; the paths stay
        // the ones named on the diff --git line
        Some("copy") => {
            header.change_type = ChangeType::Copy;
            let _ = rest.next_if(|l| token(l, 0) == Some("copy"));
        }
        // "rename from <path>" paired with "rename to <path>"
        Some("rename") => {
            header.change_type = ChangeType::Renaming;
            if let Some(from) = line.strip_prefix("rename from ") {
                header.from_path = Some(from);
            }
            if let Some(pair) = rest.next_if(|l| l.starts_with("rename to ")) {
                header.to_path = pair.strip_prefix("rename to ");
            }
        }
        // "similarity index <n>%"
        Some("similarity") => header.similarity = percentage(line, 2),
        // "dissimilarity index <n>%"
        Some("dissimilarity") => {
            header.dissimilarity = percentage(line, 2);
            header.change_type = ChangeType::Modification;
        }
        // "index <hash>..<hash>[ <mode>]"
        Some("index") => {
            if let Some((from, to)) = token(line, 1).and_then(|t| t.split_once("..")) {
                header.from_revision = from;
                header.to_revision = to;
            }
            if let Some(mode) = numeric(line, 2) {
                header.from_mode = Some(mode);
                header.to_mode = Some(mode);
            }
        }
        // "Binary files <from> and <to> differ"
        Some("Binary") => header.is_binary = true,
        // Everything else, the ---/+++ lines included, is tolerated and
        // ignored.
        _ => {}
    }
}

// The idx'th space-separated token of a header line
fn token(line: &str, idx: usize) -> Option<&str> {
    line.split(' ').nth(idx)
}

// File modes are kept as the decimal number git prints
fn numeric(line: &str, idx: usize) -> Option<u32> {
    token(line, idx).and_then(|t| t.parse().ok())
}

// Similarity scores; git prints these with a trailing '%'
fn percentage(line: &str, idx: usize) -> Option<u8> {
    token(line, idx).and_then(|t| t.strip_suffix('%').unwrap_or(t).parse().ok())
}

/// Parse a `@@ -<start>[,<len>] +<start>[,<len>] @@[ <context>]` line
pub(crate) fn hunk_header(line: &str) -> Result<HunkHeader<'_>> {
    let invalid = || ParsePatchError::new(format!("invalid hunk header: {line:?}"));

    let input = line.strip_prefix("@@ ").ok_or_else(invalid)?;
    let (ranges, function_context) = input.split_once(" @@").ok_or_else(invalid)?;
    let (from, to) = ranges.split_once(' ').ok_or_else(invalid)?;

    let from_range = from.strip_prefix('-').and_then(range).ok_or_else(invalid)?;
    let to_range = to.strip_prefix('+').and_then(range).ok_or_else(invalid)?;

    Ok(HunkHeader {
        raw: line,
        from_range,
        to_range,
        function_context: function_context.trim(),
    })
}

// A line count of 1 may be omitted: `12` reads as `12,1`
fn range(s: &str) -> Option<HunkRange> {
    let (start, len) = match s.split_once(',') {
        Some((start, len)) => (start.parse().ok()?, len.parse().ok()?),
        None => (s.parse().ok()?, 1),
    };

    Some(HunkRange::new(start, len))
}

/// Which sides of a hunk were marked as ending without a trailing newline
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NewlineMarkers {
    pub(crate) from: bool,
    pub(crate) to: bool,
}

impl NewlineMarkers {
    pub(crate) fn any(self) -> bool {
        self.from || self.to
    }
}

/// Parse one hunk: its `@@` line plus the body lines up to the next hunk.
///
/// Body lines are classified by their first character. The line counters of
/// the two sides run independently, seeded from the header's start values
/// and advancing by saturating addition (the range grammar admits starts up
/// to `usize::MAX`); context lines are recorded on both sides and advance
/// both counters. A leading backslash is the "no newline at end of file"
/// marker and tags the side(s) of the content line directly before it.
/// Anything else is tolerated and ignored.
pub(crate) fn hunk<'a>(lines: &[&'a str]) -> Result<(Hunk<'a>, NewlineMarkers)> {
    let header = hunk_header(lines.first().copied().unwrap_or(""))?;

    let mut from_lines = Vec::new();
    let mut to_lines = Vec::new();
    let mut from_number = header.from_range.start();
    let mut to_number = header.to_range.start();
    let mut markers = NewlineMarkers::default();
    let mut last_kind = None;

    for &line in &lines[1..] {
        if let Some(content) = line.strip_prefix('-') {
            from_lines.push(Change {
                kind: ChangeKind::Deleted,
                content,
                line_number: from_number,
            });
            from_number = from_number.saturating_add(1);
            last_kind = Some(ChangeKind::Deleted);
        } else if let Some(content) = line.strip_prefix('+') {
            to_lines.push(Change {
                kind: ChangeKind::Added,
                content,
                line_number: to_number,
            });
            to_number = to_number.saturating_add(1);
            last_kind = Some(ChangeKind::Added);
        } else if let Some(content) = line.strip_prefix(' ') {
            from_lines.push(Change {
                kind: ChangeKind::Common,
                content,
                line_number: from_number,
            });
            to_lines.push(Change {
                kind: ChangeKind::Common,
                content,
                line_number: to_number,
            });
            from_number = from_number.saturating_add(1);
            to_number = to_number.saturating_add(1);
            last_kind = Some(ChangeKind::Common);
        } else if line.starts_with('\\') {
            match last_kind {
                Some(ChangeKind::Deleted) => markers.from = true,
                Some(ChangeKind::Added) => markers.to = true,
                Some(ChangeKind::Common) => {
                    markers.from = true;
                    markers.to = true;
                }
                // Marker before any content line; ignored
                None => {}
            }
        }
    }

    Ok((
        Hunk {
            header,
            from_lines,
            to_lines,
        },
        markers,
    ))
}
