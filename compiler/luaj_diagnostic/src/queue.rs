//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Phases push everything they find; the driver decides from the counts
//! whether compilation continues and flushes the queue for rendering.

use crate::{Diagnostic, ErrorCode};

/// Queued diagnostic with its sort key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    line: u32,
    /// Insertion order, to keep sorting stable within a line.
    seq: usize,
}

/// Queue for collecting and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.push(unexpected_token(3, "`then`", "`do`"));
/// if queue.has_syntax_errors() { ... }
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    syntax_error_count: usize,
    semantic_error_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    ///
    /// A syntax error repeating the code and line of the previous syntax
    /// error is dropped: panic-mode recovery tends to report the same
    /// problem more than once.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let line = diagnostic.primary_line().unwrap_or(0);
        let code = diagnostic.code;

        if code.is_syntax_error() && self.is_repeat_syntax_error(code, line) {
            tracing::trace!(%code, line, "dropping duplicate syntax error");
            return;
        }

        self.error_count += 1;
        if code.is_syntax_error() {
            self.syntax_error_count += 1;
        } else if code.is_semantic_error() {
            self.semantic_error_count += 1;
        }

        let seq = self.diagnostics.len();
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic,
            line,
            seq,
        });
    }

    fn is_repeat_syntax_error(&self, code: ErrorCode, line: u32) -> bool {
        self.diagnostics
            .iter()
            .rev()
            .find(|q| q.diagnostic.code.is_syntax_error())
            .is_some_and(|q| q.diagnostic.code == code && q.line == line)
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Lexer plus parser errors.
    pub fn syntax_error_count(&self) -> usize {
        self.syntax_error_count
    }

    pub fn has_syntax_errors(&self) -> bool {
        self.syntax_error_count > 0
    }

    pub fn semantic_error_count(&self) -> usize {
        self.semantic_error_count
    }

    pub fn has_semantic_errors(&self) -> bool {
        self.semantic_error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterate in insertion order without draining.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|q| &q.diagnostic)
    }

    /// Drain the queue, sorted by line then insertion order.
    ///
    /// Counts are kept so the driver can still report them after rendering.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut queued = std::mem::take(&mut self.diagnostics);
        queued.sort_by_key(|q| (q.line, q.seq));
        queued.into_iter().map(|q| q.diagnostic).collect()
    }
}
