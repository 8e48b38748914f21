use super::{Change, ChangeKind, Hunk, Patch, NO_NEWLINE_AT_EOF};
use std::fmt::{Display, Formatter, Result};

#[cfg(feature = "color")]
use anstyle::{AnsiColor, Style};

/// Struct used to adjust the formatting of a `Patch`
#[derive(Debug, Default)]
pub struct PatchFormatter {
    #[cfg(feature = "color")]
    with_color: bool,

    #[cfg(feature = "color")]
    styles: Styles,
}

#[cfg(feature = "color")]
#[derive(Debug)]
struct Styles {
    context: Style,
    delete: Style,
    insert: Style,
    hunk_header: Style,
    patch_header: Style,
    function_context: Style,
}

#[cfg(feature = "color")]
impl Default for Styles {
    fn default() -> Self {
        Self {
            context: Style::new(),
            delete: AnsiColor::Red.on_default(),
            insert: AnsiColor::Green.on_default(),
            hunk_header: AnsiColor::Cyan.on_default(),
            patch_header: Style::new().bold(),
            function_context: Style::new(),
        }
    }
}

impl PatchFormatter {
    /// Construct a new formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable formatting a patch with color
    #[cfg(feature = "color")]
    pub fn with_color(mut self) -> Self {
        self.with_color = true;
        self
    }

    /// Returns a `Display` impl which can be used to print a Patch
    pub fn fmt_patch<'a>(&'a self, patch: &'a Patch<'a>) -> impl Display + 'a {
        PatchDisplay { f: self, patch }
    }

    fn fmt_hunk<'a>(&'a self, hunk: &'a Hunk<'a>, eof: EofMarkers) -> impl Display + 'a {
        HunkDisplay { f: self, hunk, eof }
    }

    fn fmt_change<'a>(&'a self, change: &'a Change<'a>) -> impl Display + 'a {
        ChangeDisplay {
            #[cfg(feature = "color")]
            f: self,
            change,
        }
    }
}

// Whether to re-emit a "no newline at end of file" marker while rendering
// a hunk. Only the final hunk of a patch can carry the markers.
#[derive(Copy, Clone, Default)]
struct EofMarkers {
    from: bool,
    to: bool,
}

struct PatchDisplay<'a> {
    f: &'a PatchFormatter,
    patch: &'a Patch<'a>,
}

impl Display for PatchDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", self.f.styles.patch_header.render())?;
        }
        write!(f, "{}", self.patch.header().raw())?;
        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", self.f.styles.patch_header.render_reset())?;
        }
        writeln!(f)?;

        let hunks = self.patch.hunks();
        for (i, hunk) in hunks.iter().enumerate() {
            let eof = if i + 1 == hunks.len() {
                EofMarkers {
                    from: self.patch.from_no_newline(),
                    to: self.patch.to_no_newline(),
                }
            } else {
                EofMarkers::default()
            };
            write!(f, "{}", self.f.fmt_hunk(hunk, eof))?;
        }

        Ok(())
    }
}

struct HunkDisplay<'a> {
    f: &'a PatchFormatter,
    hunk: &'a Hunk<'a>,
    eof: EofMarkers,
}

impl Display for HunkDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = self.hunk.header();

        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", self.f.styles.hunk_header.render())?;
        }
        write!(f, "@@ -{} +{} @@", header.from_range(), header.to_range())?;
        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", self.f.styles.hunk_header.render_reset())?;
        }

        if !header.function_context().is_empty() {
            write!(f, " ")?;
            #[cfg(feature = "color")]
            if self.f.with_color {
                write!(f, "{}", self.f.styles.function_context.render())?;
            }
            write!(f, "{}", header.function_context())?;
            #[cfg(feature = "color")]
            if self.f.with_color {
                write!(f, "{}", self.f.styles.function_context.render_reset())?;
            }
        }
        writeln!(f)?;

        // Interleave the two sides back into deletion-run, addition-run,
        // shared-context order. Every context line appears in both lists, so
        // the old side drives the walk and the new side drains alongside it.
        let from = self.hunk.from_lines();
        let to = self.hunk.to_lines();
        let mut to_idx = 0;

        for (from_idx, change) in from.iter().enumerate() {
            match change.kind() {
                ChangeKind::Deleted => {
                    write!(f, "{}", self.f.fmt_change(change))?;
                    if self.eof.from && from_idx + 1 == from.len() {
                        writeln!(f, "{}", NO_NEWLINE_AT_EOF)?;
                    }
                }
                ChangeKind::Common => {
                    // Until the context line is emitted it is still ahead of
                    // to_idx, so a drained addition is never the last line
                    // of the new side.
                    while let Some(added) = to.get(to_idx).filter(|c| c.kind() == ChangeKind::Added)
                    {
                        write!(f, "{}", self.f.fmt_change(added))?;
                        to_idx += 1;
                    }

                    write!(f, "{}", self.f.fmt_change(change))?;
                    to_idx += 1;

                    let from_last = from_idx + 1 == from.len();
                    let to_last = to_idx == to.len();
                    if (self.eof.from && from_last) || (self.eof.to && to_last) {
                        writeln!(f, "{}", NO_NEWLINE_AT_EOF)?;
                    }
                }
                ChangeKind::Added => {}
            }
        }

        // Whatever remains on the new side is the trailing addition run
        while let Some(added) = to.get(to_idx) {
            write!(f, "{}", self.f.fmt_change(added))?;
            if self.eof.to && to_idx + 1 == to.len() {
                writeln!(f, "{}", NO_NEWLINE_AT_EOF)?;
            }
            to_idx += 1;
        }

        Ok(())
    }
}

struct ChangeDisplay<'a> {
    #[cfg(feature = "color")]
    f: &'a PatchFormatter,
    change: &'a Change<'a>,
}

impl Display for ChangeDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let sign = match self.change.kind() {
            ChangeKind::Added => '+',
            ChangeKind::Deleted => '-',
            ChangeKind::Common => ' ',
        };

        #[cfg(feature = "color")]
        let style = match self.change.kind() {
            ChangeKind::Added => self.f.styles.insert,
            ChangeKind::Deleted => self.f.styles.delete,
            ChangeKind::Common => self.f.styles.context,
        };

        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", style.render())?;
        }

        write!(f, "{}{}", sign, self.change.content())?;

        #[cfg(feature = "color")]
        if self.f.with_color {
            write!(f, "{}", style.render_reset())?;
        }

        writeln!(f)
    }
}
