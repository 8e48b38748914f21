mod format;
mod parse;

pub use format::PatchFormatter;
pub use parse::ParsePatchError;

use std::{fmt, ops};

const NO_NEWLINE_AT_EOF: &str = "\\ No newline at end of file";

/// A parsed patch for a single file
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct Patch<'a> {
    header: PatchHeader<'a>,
    hunks: Vec<Hunk<'a>>,
    from_no_newline: bool,
    to_no_newline: bool,
}

impl<'a> Patch<'a> {
    /// Parse a `Patch` from its unified-diff text
    ///
    /// ```
    /// use gitpatch::{ChangeKind, ChangeType, Patch};
    ///
    /// let s = "\
    /// diff --git a/src/lib.rs b/src/lib.rs
    /// index 79f8e41..b438918 100644
    /// --- a/src/lib.rs
    /// +++ b/src/lib.rs
    /// @@ -1,3 +1,3 @@
    ///  fn answer() -> u64 {
    /// -    41
    /// +    42
    ///  }
    /// ";
    ///
    /// let patch = Patch::from_str(s)?;
    /// assert_eq!(patch.header().to_path(), Some("src/lib.rs"));
    /// assert_eq!(patch.header().change_type(), ChangeType::Modification);
    ///
    /// let hunk = &patch.hunks()[0];
    /// assert_eq!(hunk.from_lines()[1].kind(), ChangeKind::Deleted);
    /// assert_eq!(hunk.from_lines()[1].content(), "    41");
    /// assert_eq!(hunk.to_lines()[1].line_number(), 2);
    /// # Ok::<(), gitpatch::ParsePatchError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Result<Patch<'a>, ParsePatchError> {
        parse::parse(s)
    }

    /// The file-level metadata parsed from the header lines
    pub fn header(&self) -> &PatchHeader<'a> {
        &self.header
    }

    /// The hunks of the patch, in input order
    pub fn hunks(&self) -> &[Hunk<'a>] {
        &self.hunks
    }

    /// Returns `true` if a hunk reported that the old version of the file
    /// does not end with a newline
    pub fn from_no_newline(&self) -> bool {
        self.from_no_newline
    }

    /// Returns `true` if a hunk reported that the new version of the file
    /// does not end with a newline
    pub fn to_no_newline(&self) -> bool {
        self.to_no_newline
    }
}

impl fmt::Display for Patch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PatchFormatter::new().fmt_patch(self))
    }
}

/// Everything a patch says about a file before its first hunk: the
/// `diff --git` line and the extended header lines following it.
///
/// Only the `diff --git` line is mandatory. Each further directive fills in
/// or overrides part of the header, so when git emits contradictory lines
/// the later one wins.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct PatchHeader<'a> {
    raw: &'a str,
    from_path: Option<&'a str>,
    to_path: Option<&'a str>,
    from_revision: &'a str,
    to_revision: &'a str,
    change_type: ChangeType,
    from_mode: Option<u32>,
    to_mode: Option<u32>,
    similarity: Option<u8>,
    dissimilarity: Option<u8>,
    is_binary: bool,
}

impl PatchHeader<'_> {
    /// The header lines exactly as they appeared in the input
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The path of the old version, `None` when the patch creates the file
    pub fn from_path(&self) -> Option<&str> {
        self.from_path
    }

    /// The path of the new version, `None` when the patch deletes the file
    pub fn to_path(&self) -> Option<&str> {
        self.to_path
    }

    /// The abbreviated object id of the old blob, empty without an `index` line
    pub fn from_revision(&self) -> &str {
        self.from_revision
    }

    /// The abbreviated object id of the new blob, empty without an `index` line
    pub fn to_revision(&self) -> &str {
        self.to_revision
    }

    /// How the patch transforms the file
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// The mode of the old version, when the header names one
    pub fn from_mode(&self) -> Option<u32> {
        self.from_mode
    }

    /// The mode of the new version, when the header names one
    pub fn to_mode(&self) -> Option<u32> {
        self.to_mode
    }

    /// The similarity percentage reported for a rename or copy
    pub fn similarity(&self) -> Option<u8> {
        self.similarity
    }

    /// The dissimilarity percentage reported for a complete rewrite
    pub fn dissimilarity(&self) -> Option<u8> {
        self.dissimilarity
    }

    /// Whether git declared the file contents binary instead of emitting hunks
    pub fn is_binary(&self) -> bool {
        self.is_binary
    }
}

/// The kind of transformation a patch applies to a file.
///
/// Determined by which directives appear in the header. A bare header with
/// no directives describes a content [`Modification`][ChangeType::Modification].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum ChangeType {
    /// The file is created by this patch
    Addition,
    /// The file is deleted by this patch
    Deletion,
    /// The file's contents or mode change
    Modification,
    /// The file moves to a new path, possibly with edits
    Renaming,
    /// The file is copied from another path, possibly with edits
    Copy,
}

/// A contiguous block of changes, framed by an `@@` line giving the range
/// it covers on each side of the change
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct Hunk<'a> {
    header: HunkHeader<'a>,
    from_lines: Vec<Change<'a>>,
    to_lines: Vec<Change<'a>>,
}

impl<'a> Hunk<'a> {
    pub fn header(&self) -> &HunkHeader<'a> {
        &self.header
    }

    /// The lines visible on the old side: deletions and context
    pub fn from_lines(&self) -> &[Change<'a>] {
        &self.from_lines
    }

    /// The lines visible on the new side: additions and context
    pub fn to_lines(&self) -> &[Change<'a>] {
        &self.to_lines
    }
}

/// The `@@ -<start>[,<len>] +<start>[,<len>] @@` line framing a hunk
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct HunkHeader<'a> {
    raw: &'a str,
    from_range: HunkRange,
    to_range: HunkRange,
    function_context: &'a str,
}

impl HunkHeader<'_> {
    /// The marker line exactly as it appeared in the input
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The lines the hunk covers in the old version
    pub fn from_range(&self) -> HunkRange {
        self.from_range
    }

    /// The lines the hunk covers in the new version
    pub fn to_range(&self) -> HunkRange {
        self.to_range
    }

    /// The text after the closing `@@`, which git fills with the enclosing
    /// function or class; empty when the generator emitted none
    pub fn function_context(&self) -> &str {
        self.function_context
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HunkRange {
    /// The starting line number of a hunk
    start: usize,
    /// The hunk size (number of lines)
    len: usize,
}

impl HunkRange {
    pub(crate) fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn range(&self) -> ops::Range<usize> {
        self.start..self.end()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last line of the range, saturating at `usize::MAX`
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if self.len != 1 {
            write!(f, ",{}", self.len)?;
        }
        Ok(())
    }
}

/// One classified line of a hunk
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct Change<'a> {
    kind: ChangeKind,
    content: &'a str,
    line_number: usize,
}

impl Change<'_> {
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// The line's text with its leading marker character stripped
    pub fn content(&self) -> &str {
        self.content
    }

    /// The 1-based line number on this change's side of the file
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// How a single line changed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum ChangeKind {
    /// A line present only in the new version
    Added,
    /// A line present only in the old version
    Deleted,
    /// A context line present in both versions
    Common,
}
