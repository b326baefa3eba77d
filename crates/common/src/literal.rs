//! Value literals: `42`, `-1`, `true`, `'a'`, `"text"`, `null`.
//!
//! Used by the listing assembler for `push` operands and by harnesses
//! for argument tuples such as `(1, 'a', null)`.

use crate::error::ParseError;
use crate::value::Value;

/// Parse one literal at the start of `input`.
///
/// Returns the value and the number of bytes consumed. Keyword literals
/// end at the first character that cannot continue an identifier.
pub fn scan_literal(input: &str) -> Result<(Value, usize), ParseError> {
    let Some(first) = input.chars().next() else {
        return Err(ParseError::InvalidLiteral(String::new()));
    };

    match first {
        '"' => {
            let (text, len) = scan_quoted(input, '"')?;
            Ok((Value::text(text), len))
        }
        '\'' => {
            let (text, len) = scan_quoted(input, '\'')?;
            let mut it = text.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => Ok((Value::Char(c), len)),
                _ => Err(ParseError::InvalidLiteral(input[..len].to_string())),
            }
        }
        '-' | '+' | '0'..='9' => {
            let len = input
                .char_indices()
                .skip(1)
                .find(|(_, c)| !c.is_ascii_digit())
                .map_or(input.len(), |(i, _)| i);
            let token = &input[..len];
            let wide: i64 = token
                .parse()
                .map_err(|_| ParseError::InvalidLiteral(token.to_string()))?;
            let value = i32::try_from(wide).map_err(|_| ParseError::IntegerOutOfRange(wide))?;
            Ok((Value::Int(value), len))
        }
        _ => {
            let len = input
                .char_indices()
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                .map_or(input.len(), |(i, _)| i);
            let word = &input[..len];
            let value = match word {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::null(),
                _ => return Err(ParseError::InvalidLiteral(word.to_string())),
            };
            Ok((value, len))
        }
    }
}

/// Scan a quoted run starting at `input[0] == quote`, decoding escapes.
fn scan_quoted(input: &str, quote: char) -> Result<(String, usize), ParseError> {
    let mut out = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((out, i + c.len_utf8())),
            '\\' => {
                let (_, esc) = chars.next().ok_or(ParseError::UnterminatedLiteral)?;
                let decoded = match esc {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    '\\' | '"' | '\'' => esc,
                    'u' => {
                        let (open, brace) = chars.next().ok_or(ParseError::UnterminatedLiteral)?;
                        if brace != '{' {
                            return Err(ParseError::InvalidLiteral(input[..open + 1].to_string()));
                        }
                        let mut hex = String::new();
                        loop {
                            let (_, h) = chars.next().ok_or(ParseError::UnterminatedLiteral)?;
                            if h == '}' {
                                break;
                            }
                            hex.push(h);
                        }
                        u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| ParseError::InvalidLiteral(format!("\\u{{{hex}}}")))?
                    }
                    other => return Err(ParseError::InvalidLiteral(format!("\\{other}"))),
                };
                out.push(decoded);
            }
            c => out.push(c),
        }
    }

    Err(ParseError::UnterminatedLiteral)
}

/// Parse a single literal that must span the whole input (surrounding
/// whitespace allowed).
pub fn parse_value(input: &str) -> Result<Value, ParseError> {
    let trimmed = input.trim();
    let (value, len) = scan_literal(trimmed)?;
    if len != trimmed.len() {
        return Err(ParseError::InvalidLiteral(trimmed.to_string()));
    }
    Ok(value)
}

/// Parse an argument tuple: `()`, `(1)`, `(1, 'a', "s", null)`.
///
/// The surrounding parentheses are optional; an empty input is an empty
/// tuple.
pub fn parse_inputs(input: &str) -> Result<Vec<Value>, ParseError> {
    let mut rest = input.trim();
    if let Some(inner) = rest.strip_prefix('(') {
        rest = inner
            .strip_suffix(')')
            .ok_or_else(|| ParseError::InvalidLiteral(input.to_string()))?
            .trim();
    }

    let mut values = Vec::new();
    while !rest.is_empty() {
        let (value, len) = scan_literal(rest)?;
        values.push(value);
        rest = rest[len..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                return Err(ParseError::InvalidLiteral(input.to_string()));
            }
        } else if !rest.is_empty() {
            return Err(ParseError::InvalidLiteral(rest.to_string()));
        }
    }

    Ok(values)
}
