//! Recursive-descent parser for the luaj compiler.
//!
//! Builds a [`Chunk`] from source text. Syntax errors are collected with
//! panic-mode recovery at statement boundaries, so one run reports every
//! independent mistake. The tree is always produced; callers must check
//! [`ParseOutput::errors`] before handing it to later phases.

mod cursor;
mod grammar;
mod recovery;

use luaj_diagnostic::Diagnostic;
use luaj_ir::{Chunk, Ident, NodeIdGen};
use luaj_lexer::{tokenize, Token};

use crate::cursor::Cursor;

/// Result of parsing one source file.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub chunk: Chunk,
    /// Lexical errors first, then syntax errors in source order.
    pub errors: Vec<Diagnostic>,
    /// Number of identifier occurrences, i.e. of distinct `NodeId`s.
    pub node_count: u32,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

type ParseResult<T> = Result<T, Diagnostic>;

/// Parse a whole source file.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str) -> ParseOutput {
    let lexed = tokenize(source);
    let mut parser = Parser::new(&lexed.tokens);
    let chunk = parser.parse_chunk();

    let mut errors = lexed.errors;
    errors.append(&mut parser.errors);
    tracing::debug!(
        statements = chunk.block.stmts.len(),
        errors = errors.len(),
        "parsed"
    );

    ParseOutput {
        chunk,
        errors,
        node_count: parser.ids.count(),
    }
}

/// Parser state: token cursor, id allocator and collected errors.
pub(crate) struct Parser<'t, 'src> {
    cursor: Cursor<'t, 'src>,
    ids: NodeIdGen,
    errors: Vec<Diagnostic>,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            ids: NodeIdGen::new(),
            errors: Vec::new(),
        }
    }

    /// Build an identifier node from a name token.
    fn ident(&mut self, token: Token<'_>) -> Ident {
        Ident {
            name: token.text.to_string(),
            id: self.ids.fresh(),
            line: token.line,
        }
    }
}

#[cfg(test)]
mod tests;
