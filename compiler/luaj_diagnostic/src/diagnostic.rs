//! Core diagnostic types for structured error reporting.
//!
//! Source positions are 1-based line numbers. The language has no
//! multi-file compilation, so a line is enough to point at the problem.

use std::fmt;

use crate::ErrorCode;

/// A labeled source line.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub line: u32,
    pub message: String,
    /// Whether this is the primary error location.
    pub is_primary: bool,
}

impl Label {
    pub fn primary(line: u32, message: impl Into<String>) -> Self {
        Label {
            line,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(line: u32, message: impl Into<String>) -> Self {
        Label {
            line,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// An error with the context needed to render it.
///
/// Every diagnostic is an error: each one counts against the phase gate.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Main error message.
    pub message: String,
    /// Labeled lines showing where the error occurred.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, line: u32, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(line, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, line: u32, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(line, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Line of the primary label, or of the first label when none is primary.
    pub fn primary_line(&self) -> Option<u32> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .or_else(|| self.labels.first())
            .map(|l| l.line)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        if let Some(line) = self.primary_line() {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

// Constructors for the diagnostics each phase reports.

pub fn unterminated_string(line: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0001)
        .with_message("unterminated string literal")
        .with_label(line, "string starts here")
        .with_note("string literals must close on the line where they open")
}

pub fn invalid_character(line: u32, text: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0002)
        .with_message(format!("invalid character `{text}`"))
        .with_label(line, "not part of any token")
}

pub fn invalid_number(line: u32, text: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0003)
        .with_message(format!("number `{text}` does not fit in a 32-bit integer"))
        .with_label(line, "numeric literal")
}

pub fn unexpected_token(line: u32, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("expected {expected}, found {found}"))
        .with_label(line, format!("unexpected {found}"))
}

pub fn expected_expression(line: u32, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("expected expression, found {found}"))
        .with_label(line, "expression expected here")
}

pub fn expected_identifier(line: u32, found: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!("expected identifier, found {found}"))
        .with_label(line, "identifier expected here")
}

pub fn redeclared_identifier(line: u32, name: &str, first_line: Option<u32>) -> Diagnostic {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message(format!("redeclared identifier `{name}`"))
        .with_label(line, "declared again here");
    match first_line {
        Some(first) => diag.with_secondary_label(first, "first declared here"),
        None => diag,
    }
}

pub fn undeclared_function(line: u32, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002)
        .with_message(format!("call to undeclared function `{name}`"))
        .with_label(line, "no function with this name is in scope")
        .with_note("functions must be defined before the call that uses them")
}

pub fn argument_count_mismatch(line: u32, name: &str, expected: usize, found: usize) -> Diagnostic {
    let plural = if expected == 1 { "" } else { "s" };
    Diagnostic::error(ErrorCode::E2003)
        .with_message(format!(
            "function `{name}` takes {expected} argument{plural} but {found} were supplied"
        ))
        .with_label(line, "wrong number of arguments")
}

pub fn assign_to_function(line: u32, name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2004)
        .with_message(format!("cannot assign to function `{name}`"))
        .with_label(line, "assignment target is a function")
}

/// A string literal outside the argument list of `print`.
#[cold]
pub fn string_value(line: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2005)
        .with_message("string literal used as a value")
        .with_label(line, "strings can only be printed")
        .with_note("every value is a 32-bit integer; only `print` accepts strings")
}

#[cfg(test)]
mod tests;
