//! jstep assembler: text listings of method bodies ↔ [`Listing`].
//!
//! The assembler is a mechanical 1:1 translation between the listing
//! syntax and decoded instructions. No optimization, no sugar.
//!
//! # Usage
//!
//! ```
//! use jstep_assembler::{assemble, disassemble};
//!
//! let text = "method a.B.f:()I\n  push 4\n  return int\nend\n";
//! let listing = assemble(text).unwrap();
//! assert_eq!(listing.len(), 1);
//! assert_eq!(disassemble(&listing), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(disassemble(listing)) == listing` holds for every listing the
//! assembler accepts. The disassembler outputs canonical text; the
//! assembler also accepts non-canonical input (comments, any keyword case,
//! `/`-separated class names, any indentation).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use jstep_common::{Instruction, Listing, MethodCode, MethodId};
use lexer::tokenize_line;
use parser::{parse_line, Line};

/// A method block being filled.
struct OpenMethod {
    id: MethodId,
    line: usize,
    code: Vec<Instruction>,
    /// Source line of each instruction, for target checks.
    lines: Vec<usize>,
}

impl OpenMethod {
    fn close(self) -> Result<MethodCode, AsmError> {
        let len = self.code.len();
        for (instruction, &line) in self.code.iter().zip(&self.lines) {
            let target = match instruction {
                Instruction::Ifz { target, .. }
                | Instruction::If { target, .. }
                | Instruction::Goto { target } => *target,
                _ => continue,
            };
            if target >= len {
                return Err(AsmError::TargetOutOfRange { line, target, len });
            }
        }
        Ok(MethodCode {
            id: self.id,
            code: self.code,
        })
    }
}

/// Assemble listing text.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<Listing, AsmError> {
    let mut methods: Vec<MethodCode> = Vec::new();
    let mut open: Option<OpenMethod> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        let Some(parsed) = parse_line(&tokens, line_num)? else {
            continue;
        };
        match parsed {
            Line::Method(id) => {
                if open.is_some() {
                    return Err(AsmError::NestedMethod { line: line_num });
                }
                if methods.iter().any(|m| m.id == id) {
                    return Err(AsmError::DuplicateMethod {
                        line: line_num,
                        method: id.to_string(),
                    });
                }
                open = Some(OpenMethod {
                    id,
                    line: line_num,
                    code: Vec::new(),
                    lines: Vec::new(),
                });
            }
            Line::End => match open.take() {
                Some(method) => methods.push(method.close()?),
                None => return Err(AsmError::UnmatchedEnd { line: line_num }),
            },
            Line::Instruction(instruction) => match open.as_mut() {
                Some(method) => {
                    method.code.push(instruction);
                    method.lines.push(line_num);
                }
                None => return Err(AsmError::InstructionOutsideMethod { line: line_num }),
            },
        }
    }

    if let Some(method) = open {
        return Err(AsmError::UnterminatedMethod {
            line: method.line,
            method: method.id.to_string(),
        });
    }
    Ok(Listing::new(methods))
}

/// Disassemble a listing into canonical text.
///
/// The output has one indented instruction per line inside `method`/`end`
/// blocks, no comments.
pub fn disassemble(listing: &Listing) -> String {
    disassembler::disassemble(listing)
}
