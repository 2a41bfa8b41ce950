//! Node-kind dispatch.
//!
//! Each match is exhaustive with no wildcard arm, so a new AST variant
//! cannot compile until it has a translation rule.

use super::Translator;
use crate::ast::{Expression, Statement};
use crate::emitter::Sink;
use crate::error::Result;

/// A node that can be written as Lua.
pub trait Lower {
    /// Writes this node through the translator.
    fn lower<S: Sink>(&self, tr: &mut Translator<'_, S>) -> Result<()>;
}

impl Lower for Statement {
    fn lower<S: Sink>(&self, tr: &mut Translator<'_, S>) -> Result<()> {
        tr.mark(self.position());

        match self {
            Statement::Block(block) => tr.block_statement(block),
            Statement::LocalDeclaration(decl) => tr.local_declaration(decl),
            Statement::GlobalAssignment(assign) => tr.global_assignment(assign),
            Statement::CompoundAssignment(assign) => tr.compound_assignment(assign),
            Statement::FunctionCall(call) => tr.call(call),
            Statement::LabelDeclaration(label) => tr.label(label),
            Statement::Goto(stmt) => tr.goto(stmt),
            Statement::Return(stmt) => tr.return_statement(stmt),
            Statement::If(stmt) => tr.if_statement(stmt),
            Statement::While(stmt) => tr.while_statement(stmt),
            Statement::DoWhile(stmt) => tr.do_while_statement(stmt),
            Statement::For(stmt) => tr.for_statement(stmt),
            Statement::ForIn(stmt) => tr.for_in_statement(stmt),
            Statement::ForOf(stmt) => tr.for_of_statement(stmt),
            Statement::FunctionDeclaration(decl) => tr.function_declaration(decl),
            Statement::TryCatch(stmt) => tr.try_statement(stmt),
            Statement::Throw(stmt) => tr.throw_statement(stmt),
            Statement::Increment(stmt) => tr.update_statement(stmt, " + 1"),
            Statement::Decrement(stmt) => tr.update_statement(stmt, " - 1"),
            Statement::Break(_) => tr.write("break"),
            Statement::Continue(position) => tr.continue_statement(*position),
            Statement::Empty(_) => Ok(()),
        }
    }
}

impl Lower for Expression {
    fn lower<S: Sink>(&self, tr: &mut Translator<'_, S>) -> Result<()> {
        tr.mark(self.position());

        match self {
            Expression::Parenthesized(expr) => tr.parenthesized(expr),
            Expression::Literal(literal) => tr.literal(literal),
            Expression::Function(func) => tr.function_expression(func),
            Expression::Arrow(arrow) => tr.arrow_function(arrow),
            Expression::Variable(reference) => tr.reference(reference),
            Expression::Conditional(cond) => tr.conditional(cond),
            Expression::Call(call) => tr.call(call),
            Expression::Table(table) => tr.table(table),
            Expression::List(list) => tr.list(list),
            Expression::Binary(binary) => tr.binary_expression(binary),
            Expression::Unary(unary) => tr.unary(unary),
        }
    }
}
