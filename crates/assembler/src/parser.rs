//! Parser for listing tokens → instructions and block markers.
//!
//! Dispatches on the mnemonic to the operand pattern of each instruction.

use crate::error::AsmError;
use crate::lexer::Token;
use jstep_common::instruction::{ALL_BINARY_OPS, ALL_CONDITIONS};
use jstep_common::{
    BinaryOp, ClassName, Condition, FieldRef, Instruction, InvokeKind, JvmType, MethodId,
    ParseError, Value,
};

/// A meaningful listing line.
#[derive(Debug)]
pub(crate) enum Line {
    /// `method <id>` opens a block.
    Method(MethodId),
    /// `end` closes the open block.
    End,
    Instruction(Instruction),
}

fn lookup_condition(name: &str) -> Option<Condition> {
    ALL_CONDITIONS
        .iter()
        .find(|c| c.mnemonic().eq_ignore_ascii_case(name))
        .copied()
}

fn lookup_operator(name: &str) -> Option<BinaryOp> {
    ALL_BINARY_OPS
        .iter()
        .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
        .copied()
}

/// Operand cursor over one line's tokens.
struct Operands<'a> {
    tokens: std::slice::Iter<'a, Token>,
    mnemonic: &'static str,
    expected: usize,
    line: usize,
}

impl<'a> Operands<'a> {
    fn next(&mut self) -> Result<&'a Token, AsmError> {
        self.tokens.next().ok_or(AsmError::MissingArgument {
            line: self.line,
            mnemonic: self.mnemonic,
            expected: self.expected,
        })
    }

    fn word(&mut self) -> Result<&'a str, AsmError> {
        match self.next()? {
            Token::Word(w) => Ok(w),
            other => Err(AsmError::UnexpectedToken {
                line: self.line,
                token: other.text(),
            }),
        }
    }

    fn index(&mut self) -> Result<usize, AsmError> {
        match self.next()? {
            Token::Number(n) => usize::try_from(*n).map_err(|_| AsmError::InvalidNumber {
                line: self.line,
                token: n.to_string(),
            }),
            other => Err(AsmError::InvalidNumber {
                line: self.line,
                token: other.text(),
            }),
        }
    }

    fn ty(&mut self) -> Result<JvmType, AsmError> {
        let word = self.word()?;
        word.parse().map_err(|_| AsmError::UnknownType {
            line: self.line,
            token: word.to_string(),
        })
    }

    fn condition(&mut self) -> Result<Condition, AsmError> {
        let word = self.word()?;
        lookup_condition(word).ok_or_else(|| AsmError::UnknownCondition {
            line: self.line,
            token: word.to_string(),
        })
    }

    fn literal(&mut self) -> Result<Value, AsmError> {
        match self.next()? {
            Token::Quoted(value) => Ok(value.clone()),
            Token::Number(n) => i32::try_from(*n).map(Value::Int).map_err(|_| AsmError::Syntax {
                line: self.line,
                source: ParseError::IntegerOutOfRange(*n),
            }),
            Token::Word(w) => jstep_common::parse_value(w).map_err(|source| AsmError::Syntax {
                line: self.line,
                source,
            }),
        }
    }

    fn parsed<T: std::str::FromStr<Err = ParseError>>(&mut self) -> Result<T, AsmError> {
        let line = self.line;
        self.word()?
            .parse()
            .map_err(|source| AsmError::Syntax { line, source })
    }

    fn finish(mut self) -> Result<(), AsmError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(AsmError::UnexpectedToken {
                line: self.line,
                token: extra.text(),
            }),
        }
    }
}

/// Parse the tokens of a single line.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(tokens: &[Token], line_num: usize) -> Result<Option<Line>, AsmError> {
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let keyword = match head {
        Token::Word(w) => w.to_ascii_lowercase(),
        other => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: other.text(),
            })
        }
    };

    let operands = move |mnemonic: &'static str, expected: usize| Operands {
        tokens: rest.iter(),
        mnemonic,
        expected,
        line: line_num,
    };

    let parsed = match keyword.as_str() {
        "method" => {
            let mut ops = operands("method", 1);
            let id = ops.parsed()?;
            ops.finish()?;
            return Ok(Some(Line::Method(id)));
        }
        "end" => {
            operands("end", 0).finish()?;
            return Ok(Some(Line::End));
        }
        "push" => {
            let mut ops = operands("push", 1);
            let value = ops.literal()?;
            (Instruction::Push(value), ops)
        }
        "load" | "store" => {
            let mut ops = operands(if keyword == "load" { "load" } else { "store" }, 2);
            let ty = ops.ty()?;
            let index = ops.index()?;
            let instruction = if keyword == "load" {
                Instruction::Load { ty, index }
            } else {
                Instruction::Store { ty, index }
            };
            (instruction, ops)
        }
        "binary" => {
            let mut ops = operands("binary", 2);
            let ty = ops.ty()?;
            let word = ops.word()?;
            let op = lookup_operator(word).ok_or_else(|| AsmError::UnknownOperator {
                line: line_num,
                token: word.to_string(),
            })?;
            (Instruction::Binary { ty, op }, ops)
        }
        "ifz" | "if" => {
            let mut ops = operands(if keyword == "ifz" { "ifz" } else { "if" }, 2);
            let cond = ops.condition()?;
            let target = ops.index()?;
            let instruction = if keyword == "ifz" {
                Instruction::Ifz { cond, target }
            } else {
                Instruction::If { cond, target }
            };
            (instruction, ops)
        }
        "goto" => {
            let mut ops = operands("goto", 1);
            let target = ops.index()?;
            (Instruction::Goto { target }, ops)
        }
        "new" => {
            let mut ops = operands("new", 1);
            let class = ClassName::new(ops.word()?);
            (Instruction::New { class }, ops)
        }
        "dup" => {
            let mut ops = operands("dup", 1);
            let words = ops.index()?;
            (Instruction::Dup { words }, ops)
        }
        "get" => {
            let mut ops = operands("get", 2);
            let scope = ops.word()?;
            let is_static = match scope.to_ascii_lowercase().as_str() {
                "static" => true,
                "field" => false,
                _ => {
                    return Err(AsmError::UnexpectedToken {
                        line: line_num,
                        token: scope.to_string(),
                    })
                }
            };
            let field: FieldRef = ops.parsed()?;
            (Instruction::Get { is_static, field }, ops)
        }
        "throw" => (Instruction::Throw, operands("throw", 0)),
        "invoke" => {
            let mut ops = operands("invoke", 2);
            let word = ops.word()?;
            let kind = match word.to_ascii_lowercase().as_str() {
                "virtual" => InvokeKind::Virtual,
                "static" => InvokeKind::Static,
                "special" => InvokeKind::Special,
                _ => {
                    return Err(AsmError::UnexpectedToken {
                        line: line_num,
                        token: word.to_string(),
                    })
                }
            };
            let method: MethodId = ops.parsed()?;
            (Instruction::Invoke { kind, method }, ops)
        }
        "return" => {
            let mut ops = operands("return", 0);
            let ty = if rest.is_empty() { None } else { Some(ops.ty()?) };
            (Instruction::Return { ty }, ops)
        }
        _ => {
            return Err(AsmError::UnknownMnemonic {
                line: line_num,
                token: keyword,
            })
        }
    };

    let (instruction, ops) = parsed;
    ops.finish()?;
    Ok(Some(Line::Instruction(instruction)))
}
