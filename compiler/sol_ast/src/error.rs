//! Parse error records.
//!
//! Errors are accumulated in an append-only list on the [`Ast`](crate::Ast)
//! rather than raised — parsing continues after most of them, so one call
//! can surface many diagnostics.

use std::fmt;

use crate::token::{TokenIndex, TokenTag};

/// What went wrong, without location. Paired with a token in [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorTag {
    /// A specific token was required and something else was found.
    ExpectedToken(TokenTag),
    /// A declaration or directive was expected at the top level.
    ExpectedDeclaration,
    /// A contract body element was expected.
    ExpectedContractMember,
    ExpectedStatement,
    ExpectedExpression,
    ExpectedTypeExpression,
    ExpectedIdentifier,
    ExpectedSemicolon,
    /// Closing delimiter never found for an open `(`/`[`/`{`.
    UnbalancedDelimiter,
    /// Trailing comma in a fixed list (enum members, parameter lists).
    TrailingComma,
    /// A storage location keyword where none is allowed (e.g. `calldata`
    /// on an event parameter).
    DisallowedStorageLocation,
    /// Lexically invalid byte sequence reached the parser.
    InvalidToken,
    UnexpectedEof,
}

impl fmt::Display for ParseErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorTag::ExpectedToken(tag) => match tag.symbol() {
                Some(symbol) => write!(f, "expected '{symbol}'"),
                None => write!(f, "expected {tag:?}"),
            },
            ParseErrorTag::ExpectedDeclaration => write!(f, "expected a declaration"),
            ParseErrorTag::ExpectedContractMember => write!(f, "expected a contract body element"),
            ParseErrorTag::ExpectedStatement => write!(f, "expected a statement"),
            ParseErrorTag::ExpectedExpression => write!(f, "expected an expression"),
            ParseErrorTag::ExpectedTypeExpression => write!(f, "expected a type"),
            ParseErrorTag::ExpectedIdentifier => write!(f, "expected an identifier"),
            ParseErrorTag::ExpectedSemicolon => write!(f, "expected ';'"),
            ParseErrorTag::UnbalancedDelimiter => write!(f, "unbalanced delimiter"),
            ParseErrorTag::TrailingComma => write!(f, "trailing comma is not allowed here"),
            ParseErrorTag::DisallowedStorageLocation => {
                write!(f, "storage location is not allowed here")
            }
            ParseErrorTag::InvalidToken => write!(f, "invalid token"),
            ParseErrorTag::UnexpectedEof => write!(f, "unexpected end of source"),
        }
    }
}

/// A recorded parse error: what rule failed and at which token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub tag: ParseErrorTag,
    pub token: TokenIndex,
}

/// Propagated production failure.
///
/// Carries no payload: the diagnostic was already appended to the error
/// list when this is returned. It only unwinds control to the nearest
/// recovery boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("parsing failed")]
pub struct ParsingError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_expected_token() {
        assert_eq!(
            ParseErrorTag::ExpectedToken(TokenTag::Semicolon).to_string(),
            "expected ';'"
        );
        assert_eq!(
            ParseErrorTag::ExpectedToken(TokenTag::FatArrow).to_string(),
            "expected '=>'"
        );
    }

    #[test]
    fn display_structural_errors() {
        assert_eq!(
            ParseErrorTag::TrailingComma.to_string(),
            "trailing comma is not allowed here"
        );
        assert_eq!(
            ParseErrorTag::DisallowedStorageLocation.to_string(),
            "storage location is not allowed here"
        );
    }
}
