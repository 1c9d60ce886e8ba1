//! String literal conversion.
//!
//! Source strings arrive as raw lexemes with their quotes and escapes.
//! They are decoded, then re-escaped for the Jasmin string syntax.

use std::fmt::Write;

/// Convert a source string lexeme into Jasmin string syntax.
///
/// With `quoted`, the result is wrapped in double quotes ready for `ldc`;
/// otherwise it is a fragment to splice into a larger literal.
pub fn convert_string(lexeme: &str, quoted: bool) -> String {
    let escaped = escape(&decode(lexeme));
    if quoted {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

/// Strip the quotes from a lexeme and resolve its escape sequences.
pub fn decode(lexeme: &str) -> String {
    let body = strip_quotes(lexeme);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some(d) if d.is_ascii_digit() => {
                let mut value = d.to_digit(10).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|next| next.to_digit(10)) {
                        Some(digit) => {
                            value = value * 10 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn strip_quotes(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => chars.as_str(),
        _ => lexeme,
    }
}

/// Escape decoded text for a Jasmin string literal.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}
