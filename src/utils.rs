//! Common utilities

use std::ops;

/// A patch's text split into lines, keeping enough bookkeeping to recover
/// the raw text of any contiguous run of lines without copying.
///
/// Splitting is on `'\n'` alone. A final newline terminates the last line
/// rather than opening an empty one.
pub struct Lines<'a> {
    src: &'a str,
    lines: Vec<&'a str>,
    starts: Vec<usize>,
}

impl<'a> Lines<'a> {
    pub fn split(src: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut starts = Vec::new();
        let mut offset = 0;

        for line in src.split('\n') {
            lines.push(line);
            starts.push(offset);
            offset += line.len() + 1;
        }

        if src.ends_with('\n') {
            lines.pop();
            starts.pop();
        }

        Self { src, lines, starts }
    }

    /// The source text covered by the given run of lines, without the final
    /// line's terminator.
    pub fn raw(&self, range: ops::Range<usize>) -> &'a str {
        if range.is_empty() {
            return "";
        }

        let start = self.starts[range.start];
        let end = self.starts[range.end - 1] + self.lines[range.end - 1].len();
        &self.src[start..end]
    }
}

impl<'a> ops::Deref for Lines<'a> {
    type Target = [&'a str];

    fn deref(&self) -> &Self::Target {
        &self.lines
    }
}
