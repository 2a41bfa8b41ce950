//! Loop lowering and `continue` emulation.
//!
//! Lua has no `continue`, so each loop depth owns a label
//! `continue_<hash>_<depth>` placed at the end of the iteration. A
//! `continue` becomes a `goto` to the label of the innermost loop, and the
//! label is only written when some `continue` referenced it.

use super::Translator;
use super::dispatch::Lower;
use crate::ast::*;
use crate::emitter::Sink;
use crate::error::{Result, SemanticError};
use crate::lexer::Position;
use tracing::trace;

/// A `for` statement that maps onto Lua's numeric `for`.
#[derive(Debug, PartialEq)]
struct NumericLoop<'a> {
    variable: &'a Identifier,
    start: &'a str,
    stop: &'a str,
    step: String,
}

/// Direction of a numeric loop bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

impl<'a> NumericLoop<'a> {
    /// Matches `for (let i = A; i <= B; i++)` and its variants.
    fn recognize(stmt: &'a ForStatement) -> Option<Self> {
        let Some(Statement::LocalDeclaration(init)) = stmt.init.as_deref() else {
            return None;
        };
        let ([variable], [start]) = (init.names.as_slice(), init.values.as_slice()) else {
            return None;
        };
        let start = start.as_number()?;

        let Some(Expression::Binary(test)) = &stmt.test else {
            return None;
        };
        let direction = match test.operator {
            BinaryOperator::LessThanEqual => Direction::Ascending,
            BinaryOperator::GreaterThanEqual => Direction::Descending,
            _ => return None,
        };
        let Expression::Variable(bound) = test.left.as_ref() else {
            return None;
        };
        if bound.as_name() != Some(variable.name.as_str()) {
            return None;
        }
        let stop = test.right.as_number()?;

        let step = match stmt.update.as_deref()? {
            Statement::Increment(update) if is_variable(&update.target, variable) => {
                "1".to_string()
            }
            Statement::Decrement(update) if is_variable(&update.target, variable) => {
                "-1".to_string()
            }
            Statement::CompoundAssignment(update) if is_variable(&update.target, variable) => {
                let amount = update.value.as_number()?;
                match update.operator {
                    BinaryOperator::Add => amount.to_string(),
                    BinaryOperator::Subtract => format!("-{}", amount),
                    _ => return None,
                }
            }
            _ => return None,
        };

        // The step has to move towards the bound, or the two forms would
        // run a different number of iterations.
        let step_value = number_value(step.trim_start_matches('-'))?;
        let negative = step.starts_with('-');
        let agrees = match direction {
            Direction::Ascending => step_value > 0.0 && !negative,
            Direction::Descending => step_value > 0.0 && negative,
        };
        if !agrees {
            trace!(
                variable = %variable.name,
                step = %step,
                "step direction disagrees with bound, keeping generic loop"
            );
            return None;
        }

        Some(Self {
            variable,
            start,
            stop,
            step,
        })
    }
}

fn is_variable(target: &VariableReference, variable: &Identifier) -> bool {
    target.as_name() == Some(variable.name.as_str())
}

/// Numeric value of an unsigned number literal.
fn number_value(text: &str) -> Option<f64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    text.parse().ok()
}

impl<S: Sink> Translator<'_, S> {
    fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    /// Writes the continue label if it was used and leaves the loop.
    fn exit_loop(&mut self) -> Result<()> {
        if self.referenced_labels.remove(&self.loop_depth) {
            let label = self.hash.continue_label(self.loop_depth);
            self.write("::")?;
            self.write(&label)?;
            self.write("::;")?;
        }
        self.loop_depth -= 1;
        Ok(())
    }

    /// Writes a loop body followed by its continue label.
    fn loop_body(&mut self, body: &Statement) -> Result<()> {
        self.enter_loop();
        self.body(body)?;
        self.exit_loop()
    }

    pub(super) fn continue_statement(&mut self, position: Position) -> Result<()> {
        if self.loop_depth == 0 {
            return Err(SemanticError::continue_outside_loop(position).into());
        }

        let label = self.hash.continue_label(self.loop_depth);
        self.write("goto ")?;
        self.write(&label)?;
        self.referenced_labels.insert(self.loop_depth);
        Ok(())
    }

    pub(super) fn while_statement(&mut self, stmt: &WhileStatement) -> Result<()> {
        self.write("while (")?;
        stmt.test.lower(self)?;
        self.write(") do ")?;
        self.loop_body(&stmt.body)?;
        self.write(" end")
    }

    pub(super) fn do_while_statement(&mut self, stmt: &DoWhileStatement) -> Result<()> {
        // Body locals must be out of scope at the label and in `until`.
        self.write("repeat do ")?;
        self.enter_loop();
        self.body(&stmt.body)?;
        self.write(" end")?;
        self.exit_loop()?;
        self.write(" until (not (")?;
        stmt.test.lower(self)?;
        self.write("))")
    }

    pub(super) fn for_statement(&mut self, stmt: &ForStatement) -> Result<()> {
        if let Some(numeric) = NumericLoop::recognize(stmt) {
            trace!(variable = %numeric.variable.name, "using numeric for loop");
            return self.numeric_for(stmt, &numeric);
        }

        self.write("do ")?;

        if let Some(init) = &stmt.init {
            init.lower(self)?;
            self.write("; ")?;
        }

        self.write("while ")?;
        match &stmt.test {
            Some(test) => {
                self.write("(")?;
                test.lower(self)?;
                self.write(")")?;
            }
            None => self.write("true")?,
        }

        self.write(" do do ")?;
        self.enter_loop();
        self.body(&stmt.body)?;
        self.write(" end")?;
        self.exit_loop()?;

        if let Some(update) = &stmt.update {
            self.write(" ")?;
            update.lower(self)?;
            self.write("; ")?;
        }

        self.write(" end end")
    }

    fn numeric_for(&mut self, stmt: &ForStatement, numeric: &NumericLoop<'_>) -> Result<()> {
        self.write("for ")?;
        self.identifier(numeric.variable)?;
        self.write(" = ")?;
        self.write(numeric.start)?;
        self.write(", ")?;
        self.write(numeric.stop)?;
        self.write(", ")?;
        self.write(&numeric.step)?;
        self.write(" do ")?;
        self.loop_body(&stmt.body)?;
        self.write(" end")
    }

    pub(super) fn for_in_statement(&mut self, stmt: &ForInStatement) -> Result<()> {
        self.write("for ")?;
        self.identifiers(&stmt.names)?;
        self.write(" in ")?;
        stmt.iterator.lower(self)?;
        self.write(" do ")?;
        self.loop_body(&stmt.body)?;
        self.write(" end")
    }

    pub(super) fn for_of_statement(&mut self, stmt: &ForOfStatement) -> Result<()> {
        self.write("for ")?;
        match &stmt.index {
            Some(index) => self.identifier(index)?,
            None => self.write("_")?,
        }
        self.write(", ")?;
        self.identifier(&stmt.value)?;
        self.write(" in ipairs(")?;
        stmt.iterable.lower(self)?;
        self.write(") do ")?;
        self.loop_body(&stmt.body)?;
        self.write(" end")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn for_statement(src: &str) -> ForStatement {
        match Parser::parse(src).unwrap().body.into_iter().next() {
            Some(Statement::For(stmt)) => stmt,
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    fn step_of(src: &str) -> Option<String> {
        let stmt = for_statement(src);
        NumericLoop::recognize(&stmt).map(|n| n.step)
    }

    #[test]
    fn test_recognizes_simple_numeric_loops() {
        assert_eq!(step_of("for (let i = 0; i <= 10; i++) {}"), Some("1".into()));
        assert_eq!(step_of("for (let i = 10; i >= 0; i--) {}"), Some("-1".into()));
        assert_eq!(step_of("for (let i = 0; i <= 10; i += 2) {}"), Some("2".into()));
        assert_eq!(step_of("for (let i = 9; i >= 1; i -= 0.5) {}"), Some("-0.5".into()));
        assert_eq!(step_of("for (let i = 0; i <= 99; i += 0x10) {}"), Some("0x10".into()));
    }

    #[test]
    fn test_strict_comparisons_are_not_optimized() {
        assert_eq!(step_of("for (let i = 0; i < 10; i++) {}"), None);
        assert_eq!(step_of("for (let i = 10; i > 0; i--) {}"), None);
    }

    #[test]
    fn test_update_must_target_loop_variable() {
        assert_eq!(step_of("for (let i = 0; i <= 10; j++) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10; j += 1) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10; t.i++) {}"), None);
    }

    #[test]
    fn test_step_direction_must_match_bound() {
        assert_eq!(step_of("for (let i = 0; i <= 10; i--) {}"), None);
        assert_eq!(step_of("for (let i = 10; i >= 0; i++) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10; i += 0) {}"), None);
        assert_eq!(step_of("for (let i = 10; i >= 0; i -= 0) {}"), None);
    }

    #[test]
    fn test_shape_mismatches_are_not_optimized() {
        assert_eq!(step_of("for (let i = n; i <= 10; i++) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= n; i++) {}"), None);
        assert_eq!(step_of("for (let i, j = 0, 1; i <= 10; i++) {}"), None);
        assert_eq!(step_of("for (let i = 0; 10 >= i; i++) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10; i *= 2) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10; i += n) {}"), None);
        assert_eq!(step_of("for (let i = 0; i <= 10;) {}"), None);
        assert_eq!(step_of("for (i = 0; i <= 10; i++) {}"), None);
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value("0x10"), Some(16.0));
        assert_eq!(number_value("1e2"), Some(100.0));
        assert_eq!(number_value(".5"), Some(0.5));
        assert_eq!(number_value("0"), Some(0.0));
    }
}
