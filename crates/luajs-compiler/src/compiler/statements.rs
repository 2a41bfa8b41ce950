//! Statement lowering.
//!
//! | Statement | Lua |
//! |-----------|-----|
//! | `{ ... }` | `do ... end` |
//! | `let a = x` | `local a = x` |
//! | `v op= e` | `v = v op e` |
//! | `v++` / `v--` | `v = v + 1` / `v = v - 1` |
//! | `if (c) a else b` | `if (c) then a else b end` |
//! | `function a.b:c(x) {}` | `function a.b:c(x) end` |
//! | `try {} catch (e) {}` | `pcall` closure plus a status check |
//! | `throw e` | `error(e)` |

use super::Translator;
use super::dispatch::Lower;
use crate::ast::*;
use crate::emitter::Sink;
use crate::error::Result;
use crate::naming::TempRole;
use tracing::trace;

impl<S: Sink> Translator<'_, S> {
    /// Writes statements as `a; b;`.
    pub(super) fn statement_list(&mut self, statements: &[Statement]) -> Result<()> {
        for (i, statement) in statements.iter().enumerate() {
            statement.lower(self)?;
            self.write(";")?;
            if i + 1 < statements.len() {
                self.write(" ")?;
            }
        }
        Ok(())
    }

    /// Writes the body of a branch, loop or function. A block body is
    /// already enclosed by the surrounding construct, so it gets no `do`.
    pub(super) fn body(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Block(block) => self.statement_list(&block.body),
            other => other.lower(self),
        }
    }

    pub(super) fn block_statement(&mut self, block: &BlockStatement) -> Result<()> {
        self.write("do ")?;
        self.statement_list(&block.body)?;
        self.write(" end")
    }

    pub(super) fn local_declaration(&mut self, decl: &LocalDeclaration) -> Result<()> {
        self.write("local ")?;
        self.identifiers(&decl.names)?;
        if !decl.values.is_empty() {
            self.write(" = ")?;
            self.expressions(&decl.values)?;
        }
        Ok(())
    }

    pub(super) fn global_assignment(&mut self, assign: &GlobalAssignment) -> Result<()> {
        self.comma_separated(&assign.targets, |tr, target| tr.reference(target))?;
        self.write(" = ")?;
        self.expressions(&assign.values)
    }

    pub(super) fn compound_assignment(&mut self, assign: &CompoundAssignment) -> Result<()> {
        self.reference(&assign.target)?;
        self.write(" = ")?;
        self.compound_value(assign)
    }

    pub(super) fn update_statement(&mut self, stmt: &UpdateStatement, step: &str) -> Result<()> {
        self.reference(&stmt.target)?;
        self.write(" = ")?;
        self.reference(&stmt.target)?;
        self.write(step)
    }

    pub(super) fn label(&mut self, label: &LabelStatement) -> Result<()> {
        self.write("::")?;
        self.identifier(&label.label)?;
        self.write("::")
    }

    pub(super) fn goto(&mut self, stmt: &GotoStatement) -> Result<()> {
        self.write("goto ")?;
        self.identifier(&stmt.label)
    }

    pub(super) fn return_statement(&mut self, stmt: &ReturnStatement) -> Result<()> {
        if stmt.values.is_empty() {
            return self.write("return");
        }
        self.write("return ")?;
        self.expressions(&stmt.values)
    }

    pub(super) fn if_statement(&mut self, stmt: &IfStatement) -> Result<()> {
        self.write("if (")?;
        stmt.test.lower(self)?;
        self.write(") then ")?;
        self.body(&stmt.consequent)?;

        if let Some(alternate) = &stmt.alternate {
            self.write(" else ")?;
            self.body(alternate)?;
        }

        self.write(" end")
    }

    pub(super) fn function_declaration(&mut self, decl: &FunctionDeclaration) -> Result<()> {
        self.write("function ")?;
        for (i, part) in decl.path.iter().enumerate() {
            if i > 0 {
                self.write(".")?;
            }
            self.identifier(part)?;
        }
        if let Some(method) = &decl.method {
            self.write(":")?;
            self.identifier(method)?;
        }
        self.function_rest(&decl.params, &decl.body)
    }

    /// Writes `(params) body end`, shared by declarations and literals.
    pub(super) fn function_rest(
        &mut self,
        params: &[Identifier],
        body: &BlockStatement,
    ) -> Result<()> {
        self.write("(")?;
        self.identifiers(params)?;
        self.write(") ")?;
        self.statement_list(&body.body)?;
        self.write(" end")
    }

    pub(super) fn try_statement(&mut self, stmt: &TryStatement) -> Result<()> {
        let n = self.temp_counter;
        self.temp_counter += 1;

        let status = self.hash.temp_name(TempRole::Status, n);
        let value = self.hash.temp_name(TempRole::Value, n);
        trace!(status = %status, value = %value, "lowering try/catch");

        self.write("do local ")?;
        self.write(&status)?;
        self.write(", ")?;
        self.write(&value)?;
        self.write(" = pcall(function() ")?;
        self.statement_list(&stmt.block.body)?;
        self.write(" end); if not ")?;
        self.write(&status)?;
        self.write(" then ")?;

        if let Some(param) = &stmt.param {
            // `local` goes on the parameter's line too
            self.mark(param.position);
            self.write("local ")?;
            self.identifier(param)?;
            self.write(" = ")?;
            self.write(&value)?;
            self.write("; ")?;
        }

        self.statement_list(&stmt.handler.body)?;
        self.write(" end end")
    }

    pub(super) fn throw_statement(&mut self, stmt: &ThrowStatement) -> Result<()> {
        self.write("error(")?;
        stmt.argument.lower(self)?;
        self.write(")")
    }
}
