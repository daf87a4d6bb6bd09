//! Unified error handling for the ember front end.
//!
//! Both phases keep their own plain-data error types; this module folds
//! them into one enum with accurate source locations and user-facing
//! messages.


use crate::lexer::token::Position;
use std::fmt;

/// A unified error type for both front-end phases.
///
/// Lex errors always carry the offending position; parse errors carry one
/// unless the token sequence ended before the grammar did.
#[derive(Debug, Clone, PartialEq)]
pub enum EmberError {
    /// Tokenization failed; the token stream is unusable past this point.
    Lex { message: String, position: Position },

    /// The parser hit a grammar violation; the partial tree is discarded.
    Parse {
        message: String,
        position: Option<Position>,
    },
}

impl EmberError {
    /// Create a new lex error.
    pub fn lex(message: impl Into<String>, position: Position) -> Self {
        EmberError::Lex {
            message: message.into(),
            position,
        }
    }

    /// Create a new parse error.
    pub fn parse(message: impl Into<String>, position: Option<Position>) -> Self {
        EmberError::Parse {
            message: message.into(),
            position,
        }
    }

    /// Get a short error kind description (e.g., "LexError", "ParseError").
    pub fn kind(&self) -> &'static str {
        match self {
            EmberError::Lex { .. } => "LexError",
            EmberError::Parse { .. } => "ParseError",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            EmberError::Lex { message, .. } => message,
            EmberError::Parse { message, .. } => message,
        }
    }

    /// Get the source position if available.
    pub fn position(&self) -> Option<Position> {
        match self {
            EmberError::Lex { position, .. } => Some(*position),
            EmberError::Parse { position, .. } => *position,
        }
    }
}

impl fmt::Display for EmberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmberError::Lex { message, position } => {
                write!(
                    f,
                    "LexError at {}:{}: {}",
                    position.line, position.column, message
                )
            }
            EmberError::Parse { message, position } => {
                if let Some(position) = position {
                    write!(
                        f,
                        "ParseError at {}:{}: {}",
                        position.line, position.column, message
                    )
                } else {
                    write!(f, "ParseError: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for EmberError {}

// Conversions from the phase error types

impl From<crate::lexer::LexError> for EmberError {
    fn from(err: crate::lexer::LexError) -> Self {
        use crate::lexer::LexError;
        match err {
            LexError::UnexpectedToken { what, position } => {
                EmberError::lex(format!("Unexpected {what}"), position)
            }
            LexError::MismatchedBracket { ch, position } => EmberError::lex(
                format!("Unexpected '{ch}'. Did you forget to close another bracket?"),
                position,
            ),
            LexError::InvalidNumber { message, position } => EmberError::lex(message, position),
            LexError::UnterminatedString { position } => {
                EmberError::lex("Unterminated string literal", position)
            }
            LexError::UnknownToken { position } => EmberError::lex("Unknown token type", position),
            LexError::InvalidUtf8 { position } => {
                EmberError::lex("Invalid UTF-8 byte sequence", position)
            }
        }
    }
}

impl From<crate::parser::ParseError> for EmberError {
    fn from(err: crate::parser::ParseError) -> Self {
        EmberError::parse(err.message, err.position)
    }
}
