//! Token cursor for navigating the token stream.

use luaj_diagnostic::{unexpected_token, Diagnostic};
use luaj_lexer::{Token, TokenKind};

/// Cursor over a token list whose last token is always EOF.
pub(crate) struct Cursor<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
}

impl<'t, 'src> Cursor<'t, 'src> {
    pub(crate) fn new(tokens: &'t [Token<'src>]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind == TokenKind::Eof),
            "token list must end with EOF"
        );
        Cursor { tokens, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// The current token. Stays on EOF once reached.
    #[inline]
    pub(crate) fn current(&self) -> Token<'src> {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[self.pos.min(last)]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token<'src> {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or report what was found instead.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.current();
            Err(unexpected_token(
                found.line,
                kind.describe(),
                &found.describe(),
            ))
        }
    }
}
