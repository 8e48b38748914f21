//! Parse git patches into a structured, queryable document model
//!
//! The entry point is [`Patch::from_str`], which takes the unified-diff text
//! of a single file's change, as produced by `git diff` or `git show`, and
//! builds a [`Patch`]: the file-level metadata from the `diff --git` line and
//! the extended header lines that follow it, plus each hunk with its lines
//! classified, numbered, and split per side of the change.
//!
//! Parsing is lenient where git itself is lenient. Only a missing or
//! malformed `diff --git` line and a malformed `@@` hunk header are fatal;
//! unrecognized header lines and stray hunk content are ignored.
//!
//! # Feature flags
//!
//! - `color`: colored terminal output via [`PatchFormatter`]
//! - `serde`: `Serialize` impls for the whole patch model

mod patch;
mod utils;

pub use patch::{
    Change, ChangeKind, ChangeType, Hunk, HunkHeader, HunkRange, ParsePatchError, Patch,
    PatchFormatter, PatchHeader,
};
