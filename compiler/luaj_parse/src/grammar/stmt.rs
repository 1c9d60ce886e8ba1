//! Block and statement productions.

use std::rc::Rc;

use luaj_diagnostic::{expected_identifier, unexpected_token};
use luaj_ir::{Block, Call, Chunk, CondBranch, FunctionDef, IfStmt, Stmt, StmtKind};
use luaj_lexer::{Token, TokenKind};

use crate::recovery::{synchronize, BLOCK_END};
use crate::{ParseResult, Parser};

impl<'src> Parser<'_, 'src> {
    /// `chunk := block EOF`
    ///
    /// A stray `end`, `else`, `elseif` or `until` at top level is reported
    /// and skipped; parsing then resumes.
    pub(crate) fn parse_chunk(&mut self) -> Chunk {
        let mut stmts = Vec::new();
        loop {
            stmts.extend(self.block().stmts);
            if self.cursor.is_at_end() {
                break;
            }
            let stray = self.cursor.advance();
            self.errors.push(unexpected_token(
                stray.line,
                "statement",
                &stray.describe(),
            ));
        }
        Chunk {
            block: Block::new(stmts),
        }
    }

    /// `block := {stat [';']} ['return' [exp] [';']]`
    ///
    /// Stops in front of the token that closes the block without consuming
    /// it. A failed statement is reported and skipped.
    pub(crate) fn block(&mut self) -> Block {
        let mut stmts = Vec::new();
        let mut returned = false;

        while !BLOCK_END.contains(self.cursor.current_kind()) {
            if returned {
                let token = self.cursor.current();
                self.errors.push(unexpected_token(
                    token.line,
                    "end of block after `return`",
                    &token.describe(),
                ));
                returned = false;
            }
            if self.cursor.eat(TokenKind::Semicolon) {
                continue;
            }

            let start = self.cursor.position();
            let parsed = if self.cursor.check(TokenKind::Return) {
                returned = true;
                self.return_stmt()
            } else {
                self.statement()
            };
            match parsed {
                Ok(stmt) => stmts.push(stmt),
                Err(diag) => {
                    self.errors.push(diag);
                    synchronize(&mut self.cursor, start);
                }
            }
        }
        Block::new(stmts)
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Name => self.name_stmt()?,
            TokenKind::Print => {
                self.cursor.advance();
                StmtKind::Print(self.args()?)
            }
            TokenKind::If => self.if_stmt()?,
            TokenKind::Repeat => self.repeat_stmt()?,
            TokenKind::Function => self.function_def()?,
            _ => return Err(unexpected_token(token.line, "statement", &token.describe())),
        };
        Ok(Stmt {
            kind,
            line: token.line,
        })
    }

    /// `NAME '=' exp` or `NAME '(' [explist] ')'`
    fn name_stmt(&mut self) -> ParseResult<StmtKind> {
        let token = self.cursor.advance();
        let name = self.ident(token);
        match self.cursor.current_kind() {
            TokenKind::Assign => {
                self.cursor.advance();
                let value = self.expr()?;
                Ok(StmtKind::Assign {
                    target: name,
                    value,
                })
            }
            TokenKind::LParen => {
                let args = self.args()?;
                Ok(StmtKind::Call(Call { callee: name, args }))
            }
            _ => {
                let found = self.cursor.current();
                Err(unexpected_token(found.line, "`=` or `(`", &found.describe()))
            }
        }
    }

    fn if_stmt(&mut self) -> ParseResult<StmtKind> {
        self.cursor.advance();
        let mut branches = vec![self.cond_branch()?];
        while self.cursor.eat(TokenKind::Elseif) {
            branches.push(self.cond_branch()?);
        }
        let else_block = if self.cursor.eat(TokenKind::Else) {
            Some(self.block())
        } else {
            None
        };
        self.cursor.expect(TokenKind::End)?;
        Ok(StmtKind::If(IfStmt {
            branches,
            else_block,
        }))
    }

    /// `exp 'then' block`
    fn cond_branch(&mut self) -> ParseResult<CondBranch> {
        let cond = self.expr()?;
        self.cursor.expect(TokenKind::Then)?;
        let block = self.block();
        Ok(CondBranch { cond, block })
    }

    fn repeat_stmt(&mut self) -> ParseResult<StmtKind> {
        self.cursor.advance();
        let body = self.block();
        self.cursor.expect(TokenKind::Until)?;
        let until = self.expr()?;
        Ok(StmtKind::Repeat { body, until })
    }

    /// `'function' NAME '(' [namelist] ')' block 'end'`
    fn function_def(&mut self) -> ParseResult<StmtKind> {
        self.cursor.advance();
        let token = self.expect_name()?;
        let name = self.ident(token);

        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                let token = self.expect_name()?;
                params.push(self.ident(token));
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RParen)?;

        let body = self.block();
        self.cursor.expect(TokenKind::End)?;
        Ok(StmtKind::Function(FunctionDef {
            name,
            params,
            body: Rc::new(body),
        }))
    }

    fn return_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.cursor.advance().line;
        let kind = self.cursor.current_kind();
        let value = if BLOCK_END.contains(kind) || kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.expr()?)
        };
        self.cursor.eat(TokenKind::Semicolon);
        Ok(Stmt {
            kind: StmtKind::Return(value),
            line,
        })
    }

    fn expect_name(&mut self) -> ParseResult<Token<'src>> {
        if self.cursor.check(TokenKind::Name) {
            Ok(self.cursor.advance())
        } else {
            let found = self.cursor.current();
            Err(expected_identifier(found.line, &found.describe()))
        }
    }
}
