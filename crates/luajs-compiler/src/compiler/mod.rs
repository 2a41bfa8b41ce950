//! Translation from the LuaJS AST to Lua source text.
//!
//! The [`Translator`] walks an immutable [`Program`] and writes Lua through
//! an [`Emitter`], telling it the source line of every construct first so the
//! output keeps the original line numbers.
//!
//! # Module Structure
//!
//! - `dispatch`: the [`Lower`] trait, one exhaustive match per node kind
//! - `statements`: sequencing, assignments, branches, functions, try/catch
//! - `loops`: loop lowering, the numeric-loop rewrite and `continue` labels
//! - `expressions`: operators, chains, literals and constructors
//! - `strings`: re-escaping of string literals

mod dispatch;
mod expressions;
mod loops;
mod statements;
mod strings;


pub use dispatch::Lower;

use crate::ast::{Identifier, Program};
use crate::emitter::{Emitter, Sink};
use crate::error::Result;
use crate::lexer::Position;
use crate::naming::SourceHash;
use rustc_hash::FxHashSet;

/// Per-conversion translation state.
pub struct Translator<'h, S> {
    out: Emitter<S>,
    hash: &'h SourceHash,
    /// Current loop nesting, 0 outside any loop
    loop_depth: u32,
    /// Loop depths whose continue label has been jumped to
    referenced_labels: FxHashSet<u32>,
    /// Next try/catch scratch variable index
    temp_counter: u32,
}

impl<'h, S: Sink> Translator<'h, S> {
    /// Creates a translator writing to `sink`.
    pub fn new(hash: &'h SourceHash, sink: S) -> Self {
        Self {
            out: Emitter::new(sink),
            hash,
            loop_depth: 0,
            referenced_labels: FxHashSet::default(),
            temp_counter: 0,
        }
    }

    /// Translates a whole program.
    pub fn translate(&mut self, program: &Program) -> Result<()> {
        self.statement_list(&program.body)
    }

    /// Returns the sink.
    pub fn into_inner(self) -> S {
        self.out.into_inner()
    }

    fn mark(&mut self, position: Position) {
        self.out.mark_line(position.line);
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.out.write(text)?;
        Ok(())
    }

    fn identifier(&mut self, id: &Identifier) -> Result<()> {
        self.mark(id.position);
        self.write(&id.name)
    }

    fn identifiers(&mut self, ids: &[Identifier]) -> Result<()> {
        self.comma_separated(ids, |tr, id| tr.identifier(id))
    }

    fn comma_separated<T>(
        &mut self,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ")?;
            }
            each(self, item)?;
        }
        Ok(())
    }
}
