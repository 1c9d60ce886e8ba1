//! Lexer for the luaj compiler.
//!
//! Tokens borrow their text from the source. Lines are counted while
//! scanning so every token carries the 1-based line it starts on.
//! Lexical problems become diagnostics and the offending text is dropped;
//! scanning always continues to end of input.

use logos::Logos;
use luaj_diagnostic::{invalid_character, invalid_number, unterminated_string, Diagnostic};

/// Token kinds produced by logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    /// `--` line comment or `--[[ ]]` block comment.
    #[token("--", lex_comment)]
    Comment,

    #[token("\n")]
    Newline,

    // Keywords
    #[token("and")]
    And,
    #[token("else")]
    Else,
    #[token("elseif")]
    Elseif,
    #[token("end")]
    End,
    #[token("false")]
    False,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("repeat")]
    Repeat,
    #[token("return")]
    Return,
    #[token("then")]
    Then,
    #[token("true")]
    True,
    #[token("until")]
    Until,

    /// Lua keywords outside the compiled subset.
    #[token("break")]
    #[token("do")]
    #[token("for")]
    #[token("goto")]
    #[token("in")]
    #[token("local")]
    #[token("nil")]
    #[token("while")]
    Reserved,

    // Symbols
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Assign,
    #[token("==")]
    EqEq,
    #[token("~=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    /// End of input. Never produced by logos; appended by [`tokenize`].
    Eof,
}

/// Consume the rest of a comment after its leading `--`.
fn lex_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = match rest.strip_prefix("[[") {
        // Unterminated block comments run to end of input.
        Some(body) => body.find("]]").map_or(rest.len(), |end| end + 4),
        None => rest.find('\n').unwrap_or(rest.len()),
    };
    lex.bump(len);
    true
}

impl TokenKind {
    /// How the token is named in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::And => "`and`",
            TokenKind::Else => "`else`",
            TokenKind::Elseif => "`elseif`",
            TokenKind::End => "`end`",
            TokenKind::False => "`false`",
            TokenKind::Function => "`function`",
            TokenKind::If => "`if`",
            TokenKind::Not => "`not`",
            TokenKind::Or => "`or`",
            TokenKind::Print => "`print`",
            TokenKind::Repeat => "`repeat`",
            TokenKind::Return => "`return`",
            TokenKind::Then => "`then`",
            TokenKind::True => "`true`",
            TokenKind::Until => "`until`",
            TokenKind::Reserved => "unsupported keyword",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Assign => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`~=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Number => "number",
            TokenKind::Str | TokenKind::UnterminatedStr => "string",
            TokenKind::Name => "identifier",
            TokenKind::Eof => "end of file",
        }
    }
}

/// A token with its source text and line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: u32,
}

impl Token<'_> {
    /// Name used in diagnostics, quoting the text for names and literals.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Name | TokenKind::Number | TokenKind::Reserved => {
                format!("{} `{}`", self.kind.describe(), self.text)
            }
            kind => kind.describe().to_string(),
        }
    }
}

/// Tokens plus the lexical errors found while producing them.
#[derive(Clone, Debug)]
pub struct LexOutput<'src> {
    /// Never empty: the last token is always [`TokenKind::Eof`].
    pub tokens: Vec<Token<'src>>,
    pub errors: Vec<Diagnostic>,
}

/// Tokenize a whole source file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> LexOutput<'_> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut line: u32 = 1;
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        match result {
            Ok(TokenKind::Newline) => line += 1,
            Ok(TokenKind::Comment) => line += count_newlines(text),
            Ok(TokenKind::UnterminatedStr) => errors.push(unterminated_string(line)),
            Ok(TokenKind::Number) => {
                if !fits_i32(text) {
                    errors.push(invalid_number(line, text));
                }
                tokens.push(Token {
                    kind: TokenKind::Number,
                    text,
                    line,
                });
            }
            Ok(kind) => tokens.push(Token { kind, text, line }),
            Err(()) => errors.push(invalid_character(line, text)),
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "",
        line,
    });
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "lexed");

    LexOutput { tokens, errors }
}

fn count_newlines(text: &str) -> u32 {
    let count = text.bytes().filter(|b| *b == b'\n').count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Whether a numeric lexeme's integer part fits a JVM `int`.
pub fn fits_i32(text: &str) -> bool {
    integer_value(text).is_some()
}

/// The value of a numeric lexeme with any fractional part truncated.
pub fn integer_value(text: &str) -> Option<i32> {
    let whole = text.split('.').next().unwrap_or(text);
    whole.parse::<i32>().ok()
}
