//! Parse errors for method identifiers, descriptors, and value literals.

use thiserror::Error;

/// Errors that occur while parsing the textual forms used by jstep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A method identifier did not have the `Class.name:(params)ret` shape.
    #[error("invalid method id '{0}'")]
    InvalidMethodId(String),

    /// A field reference did not have the `Class.name:type` shape.
    #[error("invalid field reference '{0}'")]
    InvalidFieldRef(String),

    /// A descriptor was malformed.
    #[error("invalid descriptor '{0}'")]
    InvalidDescriptor(String),

    /// A descriptor named a type outside the supported subset.
    #[error("unsupported descriptor type '{0}'")]
    UnsupportedDescriptor(char),

    /// A type keyword was not one of `int`, `boolean`, `char`, `ref`.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// A value literal could not be parsed.
    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),

    /// A quoted literal was not closed before the end of input.
    #[error("unterminated literal")]
    UnterminatedLiteral,

    /// An integer literal does not fit in 32 bits.
    #[error("integer literal {0} out of range")]
    IntegerOutOfRange(i64),
}
