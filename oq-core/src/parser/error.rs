use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {} instead", .got.kind)]
    UnexpectedToken { expected: TokenKind, got: Token },
    #[error("no prefix parse function for {} found", .0.kind)]
    NoPrefixFunction(Token),
    #[error("could not parse {:?} as integer", .0.literal)]
    InvalidInteger(Token),
    #[error("could not parse {:?} as float", .0.literal)]
    InvalidFloat(Token),
    #[error("expression nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize, token: Token },
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: Token) -> ParseError {
        ParseError::UnexpectedToken { expected, got }
    }

    /// The token the error was reported at.
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { got, .. } => got,
            ParseError::NoPrefixFunction(token)
            | ParseError::InvalidInteger(token)
            | ParseError::InvalidFloat(token)
            | ParseError::NestingTooDeep { token, .. } => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, literal: &str) -> Token {
        Token {
            kind,
            literal: literal.into(),
            start: 4,
            end: 4 + literal.len(),
        }
    }

    #[test]
    fn test_messages() {
        let tests = vec![
            (
                ParseError::unexpected_token(TokenKind::Assign, token(TokenKind::Int, "5")),
                "expected next token to be =, got INTEGER instead",
            ),
            (
                ParseError::NoPrefixFunction(token(TokenKind::RParen, ")")),
                "no prefix parse function for ) found",
            ),
            (
                ParseError::InvalidInteger(token(TokenKind::Int, "99999999999999999999")),
                "could not parse \"99999999999999999999\" as integer",
            ),
            (
                ParseError::NestingTooDeep {
                    limit: 8,
                    token: token(TokenKind::LParen, "("),
                },
                "expression nesting exceeds the maximum depth of 8",
            ),
        ];

        for (error, expected) in tests {
            assert_eq!(error.to_string(), expected);
            assert_eq!(error.token().start, 4);
        }
    }
}
