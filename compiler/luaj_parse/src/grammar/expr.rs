//! Expression productions.
//!
//! Precedence, lowest first: `or`, `and`, comparison, `+ -`, `* / %`,
//! unary `not -`. Binary operators are left-associative.

use luaj_diagnostic::expected_expression;
use luaj_ir::{ensure_sufficient_stack, BinaryOp, Call, Expr, ExprKind, UnaryOp};
use luaj_lexer::TokenKind;

use crate::{ParseResult, Parser};

type Production<'t, 'src> = fn(&mut Parser<'t, 'src>) -> ParseResult<Expr>;

fn or_op(kind: TokenKind) -> Option<BinaryOp> {
    (kind == TokenKind::Or).then_some(BinaryOp::Or)
}

fn and_op(kind: TokenKind) -> Option<BinaryOp> {
    (kind == TokenKind::And).then_some(BinaryOp::And)
}

fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}

fn additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

impl<'t, 'src> Parser<'t, 'src> {
    /// Parse a full expression.
    pub(crate) fn expr(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.or_expr())
    }

    /// Parse a parenthesized, comma-separated argument list.
    pub(crate) fn args(&mut self) -> ParseResult<Vec<Expr>> {
        self.cursor.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                args.push(self.expr()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// One left-associative precedence level.
    fn binary_level(
        &mut self,
        operand: Production<'t, 'src>,
        operator: fn(TokenKind) -> Option<BinaryOp>,
    ) -> ParseResult<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = operator(self.cursor.current_kind()) {
            self.cursor.advance();
            let right = operand(self)?;
            let line = left.line;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                line,
            );
        }
        Ok(left)
    }

    fn or_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::and_expr, or_op)
    }

    fn and_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::comparison, and_op)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::additive, comparison_op)
    }

    fn additive(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::multiplicative, additive_op)
    }

    fn multiplicative(&mut self) -> ParseResult<Expr> {
        self.binary_level(Self::unary, multiplicative_op)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let op = match self.cursor.current_kind() {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.primary(),
        };
        let line = self.cursor.advance().line;
        let operand = ensure_sufficient_stack(|| self.unary())?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            line,
        ))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                ExprKind::Number(token.text.to_string())
            }
            TokenKind::Str => {
                self.cursor.advance();
                ExprKind::Str(token.text.to_string())
            }
            TokenKind::True => {
                self.cursor.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.cursor.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Name => {
                self.cursor.advance();
                let name = self.ident(token);
                if self.cursor.check(TokenKind::LParen) {
                    let args = self.args()?;
                    ExprKind::Call(Call { callee: name, args })
                } else {
                    ExprKind::Var(name)
                }
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                ExprKind::Paren(Box::new(inner))
            }
            _ => return Err(expected_expression(token.line, &token.describe())),
        };
        Ok(Expr::new(kind, token.line))
    }
}
