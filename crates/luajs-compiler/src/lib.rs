// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # luajs-compiler
//!
//! Translates LuaJS, a JavaScript-flavored surface syntax, into Lua 5.2
//! source that keeps the original line numbers.
//!
//! ## Overview
//!
//! A conversion runs in three stages:
//! - [`Scanner`] turns source text into positioned tokens
//! - [`Parser`] builds an immutable [`ast::Program`]
//! - [`Translator`] lowers the tree to Lua through a line-tracking [`Emitter`]
//!
//! Each conversion owns all of its state, so separate conversions can run on
//! separate threads.
//!
//! ## Quick Start
//!
//! ```rust
//! let lua = luajs_compiler::convert("let x = a != b;").unwrap();
//! assert_eq!(lua, "local x = a ~= b;");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod naming;
pub mod parser;

// Re-exports for convenience
pub use compiler::{Lower, Translator};
pub use emitter::{Emitter, IoSink, Sink};
pub use error::{Error, LexError, Result, SemanticError, SyntaxError};
pub use lexer::{Position, Scanner};
pub use naming::{SourceHash, TempRole};
pub use parser::Parser;

use tracing::debug;

/// Converts LuaJS source to Lua source.
///
/// # Errors
///
/// Returns [`Error::Syntax`] when the source does not parse and
/// [`Error::Semantic`] when it uses `continue` outside a loop.
///
/// # Examples
///
/// ```rust
/// let lua = luajs_compiler::convert("for (let i = 0; i <= 3; i++) { f(i); }").unwrap();
/// assert_eq!(lua, "for i = 0, 3, 1 do f(i); end;");
/// ```
pub fn convert(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len() + source.len() / 2);
    convert_to(source, &mut out)?;
    Ok(out)
}

/// Converts LuaJS source, appending the Lua output to `sink`.
///
/// On error the sink may already hold part of the output and should be
/// discarded.
pub fn convert_to<S: Sink>(source: &str, sink: S) -> Result<()> {
    let program = Parser::parse(source)?;
    let hash = SourceHash::of(source);
    debug!(
        bytes = source.len(),
        statements = program.body.len(),
        hash = hash.prefix(),
        "converting source"
    );

    let mut translator = Translator::new(&hash, sink);
    translator.translate(&program)
}
