//! Diagnostic collection for parsing and compiling.
//!
//! [`Diagnostics`] is the error gate of the pipeline: every stage records
//! its errors and warnings here, and the session driver polls the counts at
//! fixed checkpoints (after parsing a manifest, after compiling it) to
//! decide whether to continue. Nothing in the pipeline reports failure any
//! other way.

use std::fmt;

use crate::SourceLoc;

/// A single diagnostic message.
///
/// ```
/// use zscript_core::{Diagnostic, DiagnosticKind};
///
/// let diagnostic = Diagnostic {
///     kind: DiagnosticKind::Error,
///     message: "Unexpected ';'".to_string(),
///     section: Some("zscript/actor.zs".to_string()),
///     line: 10,
///     col: 5,
/// };
/// assert_eq!(diagnostic.to_string(), "zscript/actor.zs:10:5: error: Unexpected ';'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub kind: DiagnosticKind,
    /// Message text.
    pub message: String,
    /// The script the diagnostic refers to, if any.
    pub section: Option<String>,
    /// Line number (1-based, 0 when unknown).
    pub line: u32,
    /// Column number (1-based, 0 when unknown).
    pub col: u32,
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Blocks the next pipeline stage.
    Error,
    /// Reported, but the pipeline continues.
    Warning,
    /// Informational; never counted.
    Info,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated diagnostics with running error and warning counts.
///
/// Counts only ever grow until [`reset`](Self::reset) is called, which the
/// session does once before it starts on the first manifest.
///
/// ```
/// use zscript_core::{Diagnostics, SourceLoc};
///
/// let mut diags = Diagnostics::new();
/// diags.warning(Some("zscript.txt"), SourceLoc::point(3, 1), "Could not find script lump 'x.zs'");
/// diags.error(Some("x.zs"), SourceLoc::point(1, 9), "Unexpected '}'");
///
/// assert_eq!(diags.error_count(), 1);
/// assert_eq!(diags.warning_count(), 1);
/// assert!(diags.has_errors());
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, bumping the matching counter.
    ///
    /// The diagnostic is also emitted as a `tracing` event at the matching level.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Error => {
                self.errors += 1;
                tracing::error!("{diagnostic}");
            }
            DiagnosticKind::Warning => {
                self.warnings += 1;
                tracing::warn!("{diagnostic}");
            }
            DiagnosticKind::Info => tracing::info!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record an error.
    pub fn error(&mut self, section: Option<&str>, loc: SourceLoc, message: impl Into<String>) {
        self.report(DiagnosticKind::Error, section, loc, message);
    }

    /// Record a warning.
    pub fn warning(&mut self, section: Option<&str>, loc: SourceLoc, message: impl Into<String>) {
        self.report(DiagnosticKind::Warning, section, loc, message);
    }

    /// Record an informational note.
    pub fn info(&mut self, section: Option<&str>, loc: SourceLoc, message: impl Into<String>) {
        self.report(DiagnosticKind::Info, section, loc, message);
    }

    fn report(
        &mut self,
        kind: DiagnosticKind,
        section: Option<&str>,
        loc: SourceLoc,
        message: impl Into<String>,
    ) {
        self.add(Diagnostic {
            kind,
            message: message.into(),
            section: section.map(str::to_owned),
            line: loc.line,
            col: loc.col,
        });
    }

    /// Number of errors recorded since the last reset.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of warnings recorded since the last reset.
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop every diagnostic and zero both counters.
    pub fn reset(&mut self) {
        self.diagnostics.clear();
        self.errors = 0;
        self.warnings = 0;
    }

    /// All diagnostics in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    /// Write every diagnostic on its own line.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    /// `section:line:col: kind: message`, or `line:col: kind: message` without a section.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(
                f,
                "{}:{}:{}: {}: {}",
                section, self.line, self.col, self.kind, self.message
            ),
            None => write!(f, "{}:{}: {}: {}", self.line, self.col, self.kind, self.message),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut diags = Diagnostics::new();
        diags.error(None, SourceLoc::point(1, 1), "first");
        diags.error(None, SourceLoc::point(2, 1), "second");
        diags.warning(None, SourceLoc::point(3, 1), "third");
        diags.info(None, SourceLoc::point(4, 1), "fourth");

        assert_eq!(diags.error_count(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.iter().count(), 4);
        assert_eq!(diags.errors().count(), 2);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn info_is_never_counted() {
        let mut diags = Diagnostics::new();
        diags.info(Some("a.zs"), SourceLoc::default(), "note");
        assert!(!diags.has_errors());
        assert!(!diags.has_warnings());
        assert!(!diags.is_empty());
    }

    #[test]
    fn reset_clears_counts() {
        let mut diags = Diagnostics::new();
        diags.error(None, SourceLoc::default(), "boom");
        diags.warning(None, SourceLoc::default(), "hmm");
        diags.reset();

        assert_eq!(diags.error_count(), 0);
        assert_eq!(diags.warning_count(), 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn display_without_section() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::Warning,
            message: "careful".to_string(),
            section: None,
            line: 4,
            col: 2,
        };
        assert_eq!(diagnostic.to_string(), "4:2: warning: careful");
    }

    #[test]
    fn emit_writes_one_line_each() {
        let mut diags = Diagnostics::new();
        diags.error(Some("a.zs"), SourceLoc::point(1, 2), "one");
        diags.warning(Some("b.zs"), SourceLoc::point(3, 4), "two");

        let mut out = Vec::new();
        diags.emit(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "a.zs:1:2: error: one\nb.zs:3:4: warning: two\n");
    }
}
