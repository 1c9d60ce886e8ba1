//! Error recovery for the parser.
//!
//! After a statement fails to parse, tokens are skipped until one that can
//! begin a statement or close the enclosing block.

use luaj_lexer::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds as a bitset over the enum discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TokenSet(u64);

impl TokenSet {
    pub(crate) const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub(crate) const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u64 << kind as u32))
    }

    #[must_use]
    pub(crate) const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub(crate) const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u64 << kind as u32) != 0
    }
}

/// Tokens that end a block.
pub(crate) const BLOCK_END: TokenSet = TokenSet::new()
    .with(TokenKind::End)
    .with(TokenKind::Else)
    .with(TokenKind::Elseif)
    .with(TokenKind::Until)
    .with(TokenKind::Eof);

/// Tokens that begin a statement.
pub(crate) const STMT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Name)
    .with(TokenKind::Print)
    .with(TokenKind::If)
    .with(TokenKind::Repeat)
    .with(TokenKind::Function)
    .with(TokenKind::Return);

const RECOVERY: TokenSet = BLOCK_END.union(STMT_START);

/// Skip to the next statement boundary.
///
/// Always consumes at least one token when the failed statement consumed
/// none, so a statement loop driven by this function makes progress.
pub(crate) fn synchronize(cursor: &mut Cursor<'_, '_>, started_at: usize) {
    if cursor.position() == started_at && !cursor.is_at_end() {
        cursor.advance();
    }
    while !RECOVERY.contains(cursor.current_kind()) {
        cursor.advance();
    }
}
