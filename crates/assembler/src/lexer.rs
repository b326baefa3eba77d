//! Tokenizer for jstep listing text.

use crate::error::AsmError;
use jstep_common::literal::scan_literal;
use jstep_common::Value;

/// A single token from a listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A bare word: mnemonic, keyword, method id, field or class name.
    Word(String),
    /// A decimal integer, possibly signed.
    Number(i64),
    /// A quoted character or string literal.
    Quoted(Value),
}

impl Token {
    /// Source-like rendering for error messages.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Number(n) => n.to_string(),
            Token::Quoted(v) => v.to_string(),
        }
    }
}

fn starts_number(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some('0'..='9') => true,
        Some('-' | '+') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Tokenize a single line of listing text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` outside quotes and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while let Some(first) = rest.chars().next() {
        if first == '#' {
            break;
        }
        let len = if first == '"' || first == '\'' {
            let (value, len) = scan_literal(rest).map_err(|source| AsmError::Syntax {
                line: line_num,
                source,
            })?;
            tokens.push(Token::Quoted(value));
            len
        } else {
            let len = rest
                .find(|c: char| c.is_whitespace() || c == '#')
                .unwrap_or(rest.len());
            let word = &rest[..len];
            if starts_number(word) {
                let value = word.parse().map_err(|_| AsmError::InvalidNumber {
                    line: line_num,
                    token: word.to_string(),
                })?;
                tokens.push(Token::Number(value));
            } else {
                tokens.push(Token::Word(word.to_string()));
            }
            len
        };
        rest = rest[len..].trim_start();
    }

    Ok(tokens)
}
