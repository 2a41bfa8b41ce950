//! Lexical analysis (tokenization) for LuaJS source code.
//!
//! The lexer transforms LuaJS source text into positioned tokens that the
//! parser consumes. Number and string literals keep their exact source text
//! because the translator copies them through.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token`, `TokenKind` and `Position` definitions
//!
//! ## Usage
//!
//! ```rust
//! use luajs_compiler::lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::new("let x = 42;").tokenize().unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Let);
//! assert!(matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
//! ```

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Position, Span, Token, TokenKind};
