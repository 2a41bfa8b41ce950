// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the LuaJS translator.
//!
//! Invalid input ([`SyntaxError`], [`SemanticError`]) and failing output
//! ([`Error::Output`]) are kept apart so callers can tell "the source was
//! wrong" from "the result could not be written".

use crate::lexer::Position;
use thiserror::Error;

/// Result type for translator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Character-level problems found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that cannot start any token
    #[error("token recognition error at: {0:?}")]
    UnexpectedCharacter(char),

    /// String literal without its closing quote
    #[error("unterminated string literal")]
    UnterminatedString,

    /// Block comment without its closing `*/`
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// `\u` not followed by four hex digits
    #[error("invalid unicode escape, expected \\uXXXX")]
    InvalidUnicodeEscape,

    /// Number with a dangling exponent or hex prefix
    #[error("malformed number literal '{0}'")]
    MalformedNumber(String),
}

/// Lexical or grammatical error in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}:{column} {message}")]
pub struct SyntaxError {
    /// Line of the offending token, 1-based
    pub line: u32,
    /// Character offset of the offending token, 0-based
    pub column: u32,
    /// What went wrong
    pub message: String,
    /// The scanner failure behind this error, if any
    #[source]
    pub cause: Option<LexError>,
}

impl SyntaxError {
    /// Creates a grammar-level syntax error.
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a syntax error caused by the scanner.
    pub fn lexical(position: Position, cause: LexError) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: cause.to_string(),
            cause: Some(cause),
        }
    }

    /// Where the error was detected.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Structurally valid source that cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}:{column} {message}")]
pub struct SemanticError {
    /// Line of the offending token, 1-based
    pub line: u32,
    /// Character offset of the offending token, 0-based
    pub column: u32,
    /// What went wrong
    pub message: String,
}

impl SemanticError {
    /// `continue` used where no loop encloses it.
    pub fn continue_outside_loop(position: Position) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: "continue outside of loop".to_string(),
        }
    }

    /// Where the error was detected.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Any failure of a conversion.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be tokenized or parsed
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The source parsed but cannot be translated
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// The output sink rejected a write
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    /// Returns true when the input was at fault rather than the output.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Syntax(_) | Error::Semantic(_))
    }

    /// Source location of an input error.
    pub fn location(&self) -> Option<Position> {
        match self {
            Error::Syntax(e) => Some(e.position()),
            Error::Semantic(e) => Some(e.position()),
            Error::Output(_) => None,
        }
    }

    /// The bare message of an input error, without the location prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Syntax(e) => e.message.clone(),
            Error::Semantic(e) => e.message.clone(),
            Error::Output(e) => e.to_string(),
        }
    }
}
