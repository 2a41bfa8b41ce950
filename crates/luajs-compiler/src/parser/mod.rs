//! Parser for LuaJS source code.
//!
//! Transforms the token vector produced by the scanner into an Abstract
//! Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - The `Parser` struct, token helpers and statement parsing
//! - `expressions` - Expression parsing (operators, literals, chains)
//!
//! ## Usage
//!
//! ```rust
//! use luajs_compiler::parser::Parser;
//!
//! let program = Parser::parse("let x = 1 + 2;").expect("Should parse");
//! assert_eq!(program.body.len(), 1);
//! ```

mod expressions;
#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;
