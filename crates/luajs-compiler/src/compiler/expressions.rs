//! Expression lowering.
//!
//! ## Operators
//!
//! | LuaJS | Lua |
//! |-------|-----|
//! | `a ** b` | `a ^ b` |
//! | `a && b` / `a \|\| b` | `a and b` / `a or b` |
//! | `a != b` | `a ~= b` |
//! | `a & b`, `\|`, `^`, `<<`, `>>` | `bit32.band(a, b)` etc. |
//! | `~a` | `bit32.bnot(a)` |
//! | `!a` | `(not a)` |
//! | `a .. b` | `tostring(a) .. tostring(b)` |
//! | `c ? a : b` | `((c) and (a) or (b))` |

use super::Translator;
use super::dispatch::Lower;
use super::strings::lower_string;
use crate::ast::*;
use crate::emitter::Sink;
use crate::error::Result;
use crate::lexer::Position;

/// Left operand of a binary operation: an expression, or the target of a
/// compound assignment.
#[derive(Clone, Copy)]
enum Operand<'a> {
    Expression(&'a Expression),
    Target(&'a VariableReference),
}

impl Operand<'_> {
    /// Operands that already yield strings are not passed through `tostring`.
    fn needs_tostring(self) -> bool {
        match self {
            Operand::Expression(e) => !(e.is_concat() || e.is_string()),
            Operand::Target(_) => true,
        }
    }
}

impl<S: Sink> Translator<'_, S> {
    pub(super) fn expressions(&mut self, values: &[Expression]) -> Result<()> {
        self.comma_separated(values, |tr, value| value.lower(tr))
    }

    pub(super) fn parenthesized(&mut self, expr: &ParenthesizedExpression) -> Result<()> {
        self.write("(")?;
        expr.expression.lower(self)?;
        self.write(")")
    }

    pub(super) fn literal(&mut self, literal: &LiteralExpression) -> Result<()> {
        match &literal.value {
            Literal::String(raw) => self.write(&lower_string(raw)),
            Literal::Number(text) => self.write(text),
            Literal::Boolean(true) => self.write("true"),
            Literal::Boolean(false) => self.write("false"),
            Literal::Nil => self.write("nil"),
        }
    }

    pub(super) fn function_expression(&mut self, func: &FunctionExpression) -> Result<()> {
        self.write("function ")?;
        self.function_rest(&func.params, &func.body)
    }

    pub(super) fn arrow_function(&mut self, arrow: &ArrowFunctionExpression) -> Result<()> {
        match &arrow.body {
            ArrowBody::Block(block) => {
                self.write("function ")?;
                self.function_rest(&arrow.params, block)
            }
            ArrowBody::Expression(value) => {
                self.write("function (")?;
                self.identifiers(&arrow.params)?;
                self.write(") return ")?;
                value.lower(self)?;
                self.write(" end")
            }
        }
    }

    /// Writes a variable chain left to right.
    pub(super) fn reference(&mut self, reference: &VariableReference) -> Result<()> {
        match &reference.base {
            VariableBase::Name(name) => self.identifier(name)?,
            VariableBase::Parenthesized(expr) => {
                self.mark(expr.position);
                self.parenthesized(expr)?;
            }
        }

        for suffix in &reference.suffixes {
            self.suffix(suffix)?;
        }
        Ok(())
    }

    fn suffix(&mut self, suffix: &Suffix) -> Result<()> {
        match suffix {
            Suffix::Member(name) => {
                self.mark(name.position);
                self.write(".")?;
                self.identifier(name)
            }
            Suffix::Index(index) => {
                self.mark(index.position());
                self.write("[")?;
                index.lower(self)?;
                self.write("]")
            }
            Suffix::Call(arguments) => self.arguments(arguments),
            Suffix::Method(name, arguments) => self.method_call(name, arguments),
        }
    }

    fn method_call(&mut self, name: &Identifier, arguments: &Arguments) -> Result<()> {
        self.mark(name.position);
        self.write(":")?;
        self.identifier(name)?;
        self.arguments(arguments)
    }

    fn arguments(&mut self, arguments: &Arguments) -> Result<()> {
        self.mark(arguments.position);
        self.write("(")?;
        self.expressions(&arguments.values)?;
        self.write(")")
    }

    pub(super) fn call(&mut self, call: &CallExpression) -> Result<()> {
        self.reference(&call.callee)?;
        match &call.method {
            Some(name) => self.method_call(name, &call.arguments),
            None => self.arguments(&call.arguments),
        }
    }

    pub(super) fn conditional(&mut self, cond: &ConditionalExpression) -> Result<()> {
        self.write("((")?;
        cond.test.lower(self)?;
        self.write(") and (")?;
        cond.consequent.lower(self)?;
        self.write(") or (")?;
        cond.alternate.lower(self)?;
        self.write("))")
    }

    pub(super) fn table(&mut self, table: &TableExpression) -> Result<()> {
        self.write("{")?;
        self.comma_separated(&table.entries, |tr, entry| {
            match &entry.key {
                TableKey::Name(name) => tr.identifier(name)?,
                TableKey::Expression(key) => {
                    tr.write("[")?;
                    key.lower(tr)?;
                    tr.write("]")?;
                }
            }
            tr.write("=")?;
            entry.value.lower(tr)
        })?;
        self.write("}")
    }

    pub(super) fn list(&mut self, list: &ListExpression) -> Result<()> {
        self.write("{")?;
        self.expressions(&list.elements)?;
        self.write("}")
    }

    pub(super) fn binary_expression(&mut self, binary: &BinaryExpression) -> Result<()> {
        self.binary(
            Operand::Expression(&binary.left),
            binary.operator,
            binary.operator_position,
            &binary.right,
            false,
        )
    }

    /// Writes the `v op e` half of `v op= e`.
    pub(super) fn compound_value(&mut self, assign: &CompoundAssignment) -> Result<()> {
        self.binary(
            Operand::Target(&assign.target),
            assign.operator,
            assign.operator_position,
            &assign.value,
            true,
        )
    }

    fn binary(
        &mut self,
        left: Operand<'_>,
        operator: BinaryOperator,
        operator_position: Position,
        right: &Expression,
        compound: bool,
    ) -> Result<()> {
        match operator.lowering() {
            Lowering::Call(function) => {
                self.mark(operator_position);
                self.write(function)?;
                self.write("(")?;
                self.operand(left)?;
                self.write(", ")?;
                right.lower(self)?;
                self.write(")")
            }
            Lowering::Infix(symbol) => {
                let concat = operator == BinaryOperator::Concat;
                let wrap_left = concat && left.needs_tostring();
                let wrap_right = concat && Operand::Expression(right).needs_tostring();
                // `x *= a + b` must not become `x = x * a + b`
                let group_right =
                    compound && !wrap_right && matches!(right, Expression::Binary(_));

                self.wrapped(wrap_left, |tr| tr.operand(left))?;
                self.write(" ")?;
                self.mark(operator_position);
                self.write(symbol)?;
                self.write(" ")?;
                self.wrapped(wrap_right, |tr| {
                    if group_right {
                        tr.write("(")?;
                        right.lower(tr)?;
                        tr.write(")")
                    } else {
                        right.lower(tr)
                    }
                })
            }
        }
    }

    fn operand(&mut self, operand: Operand<'_>) -> Result<()> {
        match operand {
            Operand::Expression(e) => e.lower(self),
            Operand::Target(target) => self.reference(target),
        }
    }

    fn wrapped(
        &mut self,
        tostring: bool,
        inner: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if !tostring {
            return inner(self);
        }
        self.write("tostring(")?;
        inner(self)?;
        self.write(")")
    }

    pub(super) fn unary(&mut self, unary: &UnaryExpression) -> Result<()> {
        match unary.operator {
            UnaryOperator::Not => {
                self.write("(not ")?;
                unary.argument.lower(self)?;
                self.write(")")
            }
            UnaryOperator::BitNot => {
                self.write("bit32.bnot(")?;
                unary.argument.lower(self)?;
                self.write(")")
            }
            UnaryOperator::Negate => {
                // `--` starts a Lua comment
                let nested_negation = matches!(
                    unary.argument.as_ref(),
                    Expression::Unary(UnaryExpression {
                        operator: UnaryOperator::Negate,
                        ..
                    })
                );
                self.write(if nested_negation { "- " } else { "-" })?;
                unary.argument.lower(self)
            }
            UnaryOperator::Length => {
                self.write("#")?;
                unary.argument.lower(self)
            }
        }
    }
}
