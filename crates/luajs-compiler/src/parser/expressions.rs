//! Expression parsing.
//!
//! Precedence mirrors Lua 5.3 so the translated text needs no extra
//! parentheses to keep the same grouping.
//!
//! ## Precedence Table (lowest to highest)
//!
//! | Precedence | Operators | Associativity |
//! |------------|-----------|---------------|
//! | 1 | `?:` | right |
//! | 2 | `\|\|` | left |
//! | 3 | `&&` | left |
//! | 4 | `<` `>` `<=` `>=` `==` `!=` | left |
//! | 5 | `\|` | left |
//! | 6 | `^` | left |
//! | 7 | `&` | left |
//! | 8 | `<<` `>>` | left |
//! | 9 | `..` | right |
//! | 10 | `+` `-` | left |
//! | 11 | `*` `/` `%` | left |
//! | 12 | `!` `-` `~` `#` (prefix) | |
//! | 13 | `**` | right |
//! | 14 | `.` `[]` `()` `:m()` | left |

use super::Parser;
use crate::ast::*;
use crate::error::SyntaxError;
use crate::lexer::TokenKind;

/// Number of binary precedence levels handled by `parse_binary`.
const BINARY_LEVELS: usize = 10;

/// Maps a token to the binary operator it denotes at `level`.
fn binary_operator(level: usize, kind: &TokenKind) -> Option<BinaryOperator> {
    let operator = match (level, kind) {
        (0, TokenKind::PipePipe) => BinaryOperator::Or,
        (1, TokenKind::AmpersandAmpersand) => BinaryOperator::And,
        (2, TokenKind::LessThan) => BinaryOperator::LessThan,
        (2, TokenKind::GreaterThan) => BinaryOperator::GreaterThan,
        (2, TokenKind::LessThanEqual) => BinaryOperator::LessThanEqual,
        (2, TokenKind::GreaterThanEqual) => BinaryOperator::GreaterThanEqual,
        (2, TokenKind::EqualEqual) => BinaryOperator::Equal,
        (2, TokenKind::NotEqual) => BinaryOperator::NotEqual,
        (3, TokenKind::Pipe) => BinaryOperator::BitOr,
        (4, TokenKind::Caret) => BinaryOperator::BitXor,
        (5, TokenKind::Ampersand) => BinaryOperator::BitAnd,
        (6, TokenKind::LeftShift) => BinaryOperator::LeftShift,
        (6, TokenKind::RightShift) => BinaryOperator::RightShift,
        (7, TokenKind::DotDot) => BinaryOperator::Concat,
        (8, TokenKind::Plus) => BinaryOperator::Add,
        (8, TokenKind::Minus) => BinaryOperator::Subtract,
        (9, TokenKind::Star) => BinaryOperator::Multiply,
        (9, TokenKind::Slash) => BinaryOperator::Divide,
        (9, TokenKind::Percent) => BinaryOperator::Modulo,
        _ => return None,
    };
    Some(operator)
}

fn unary_operator(kind: &TokenKind) -> Option<UnaryOperator> {
    match kind {
        TokenKind::Bang => Some(UnaryOperator::Not),
        TokenKind::Minus => Some(UnaryOperator::Negate),
        TokenKind::Tilde => Some(UnaryOperator::BitNot),
        TokenKind::Hash => Some(UnaryOperator::Length),
        _ => None,
    }
}

impl Parser {
    /// Parses a full expression.
    pub fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        self.parse_conditional()
    }

    /// Parses `exp (, exp)*`.
    pub(super) fn parse_expression_list(&mut self) -> Result<Vec<Expression>, SyntaxError> {
        let mut values = vec![self.parse_expression()?];
        while self.eat(&TokenKind::Comma) {
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }

    /// Parse conditional (ternary) expression: test ? consequent : alternate
    fn parse_conditional(&mut self) -> Result<Expression, SyntaxError> {
        let test = self.parse_binary(0)?;

        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }

        let saved = std::mem::replace(&mut self.method_calls, false);
        let consequent = self.descend(Self::parse_conditional);
        self.method_calls = saved;
        let consequent = consequent?;

        self.expect(&TokenKind::Colon, "':'")?;
        let alternate = self.descend(Self::parse_conditional)?;

        Ok(Expression::Conditional(ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }))
    }

    fn parse_binary(&mut self, level: usize) -> Result<Expression, SyntaxError> {
        if level == BINARY_LEVELS {
            return self.parse_unary();
        }

        let mut left = self.parse_binary(level + 1)?;

        while let Some(operator) = binary_operator(level, &self.current().kind) {
            let operator_position = self.current().position;
            self.advance();
            let right = if operator == BinaryOperator::Concat {
                self.descend(|p| p.parse_binary(level))?
            } else {
                self.parse_binary(level + 1)?
            };
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                operator_position,
            });
        }

        Ok(left)
    }

    /// Every operand passes through here, so this bounds expression nesting.
    fn parse_unary(&mut self) -> Result<Expression, SyntaxError> {
        self.descend(Self::parse_prefixed)
    }

    fn parse_prefixed(&mut self) -> Result<Expression, SyntaxError> {
        let Some(operator) = unary_operator(&self.current().kind) else {
            return self.parse_power();
        };
        let position = self.current().position;
        self.advance();
        let argument = self.parse_unary()?;
        Ok(Expression::Unary(UnaryExpression {
            operator,
            argument: Box::new(argument),
            position,
        }))
    }

    /// Parses `primary ** operand`, where the operand may carry a prefix operator.
    fn parse_power(&mut self) -> Result<Expression, SyntaxError> {
        let base = self.parse_primary()?;

        if !self.check(&TokenKind::StarStar) {
            return Ok(base);
        }
        let operator_position = self.current().position;
        self.advance();
        let exponent = self.parse_unary()?;

        Ok(Expression::Binary(BinaryExpression {
            operator: BinaryOperator::Power,
            left: Box::new(base),
            right: Box::new(exponent),
            operator_position,
        }))
    }

    fn parse_primary(&mut self) -> Result<Expression, SyntaxError> {
        let token = self.current();
        let position = token.position;

        let value = match &token.kind {
            TokenKind::Number(text) => Literal::Number(text.clone()),
            TokenKind::String(text) => Literal::String(text.clone()),
            TokenKind::True => Literal::Boolean(true),
            TokenKind::False => Literal::Boolean(false),
            TokenKind::Nil => Literal::Nil,
            TokenKind::Function => return self.parse_function_expression(),
            TokenKind::LeftBrace => return self.parse_table(),
            TokenKind::LeftBracket => return self.parse_list(),
            TokenKind::Identifier(_) if matches!(self.peek_kind(1), TokenKind::Arrow) => {
                let param = self.expect_identifier()?;
                return self.parse_arrow_rest(vec![param], position);
            }
            TokenKind::LeftParen if self.is_arrow_parameters() => {
                let params = self.parse_parameters()?;
                return self.parse_arrow_rest(params, position);
            }
            TokenKind::Identifier(_) | TokenKind::LeftParen => {
                let reference = self.parse_reference()?;
                return Ok(Self::reference_expression(reference));
            }
            _ => return Err(self.unexpected("an expression")),
        };

        self.advance();
        Ok(Expression::Literal(LiteralExpression { value, position }))
    }

    /// Checks for `( names? ) =>` without consuming anything.
    fn is_arrow_parameters(&self) -> bool {
        let mut offset = 1;
        if !matches!(self.peek_kind(offset), TokenKind::RightParen) {
            loop {
                if !matches!(self.peek_kind(offset), TokenKind::Identifier(_)) {
                    return false;
                }
                offset += 1;
                if !matches!(self.peek_kind(offset), TokenKind::Comma) {
                    break;
                }
                offset += 1;
            }
            if !matches!(self.peek_kind(offset), TokenKind::RightParen) {
                return false;
            }
        }
        matches!(self.peek_kind(offset + 1), TokenKind::Arrow)
    }

    fn parse_arrow_rest(
        &mut self,
        params: Vec<Identifier>,
        position: crate::lexer::Position,
    ) -> Result<Expression, SyntaxError> {
        self.expect(&TokenKind::Arrow, "'=>'")?;

        let body = if self.check(&TokenKind::LeftBrace) {
            ArrowBody::Block(self.nested(|p| p.parse_block())?)
        } else {
            ArrowBody::Expression(Box::new(self.parse_expression()?))
        };

        Ok(Expression::Arrow(ArrowFunctionExpression {
            params,
            body,
            position,
        }))
    }

    fn parse_function_expression(&mut self) -> Result<Expression, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'function'
        let params = self.parse_parameters()?;
        let body = self.nested(|p| p.parse_block())?;
        Ok(Expression::Function(FunctionExpression {
            params,
            body,
            position,
        }))
    }

    fn parse_table(&mut self) -> Result<Expression, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume '{'

        let entries = self.nested(|p| {
            let mut entries = Vec::new();
            while !p.check(&TokenKind::RightBrace) {
                entries.push(p.parse_table_entry()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            Ok(entries)
        })?;

        self.expect(&TokenKind::RightBrace, "'}'")?;
        Ok(Expression::Table(TableExpression { entries, position }))
    }

    fn parse_table_entry(&mut self) -> Result<TableEntry, SyntaxError> {
        let token = self.current();
        let position = token.position;

        let key = match &token.kind {
            TokenKind::Identifier(_) => TableKey::Name(self.expect_identifier()?),
            TokenKind::LeftBracket => {
                self.advance();
                let key = self.parse_expression()?;
                self.expect(&TokenKind::RightBracket, "']'")?;
                TableKey::Expression(key)
            }
            TokenKind::String(text) | TokenKind::Number(text) => {
                let value = if matches!(token.kind, TokenKind::String(_)) {
                    Literal::String(text.clone())
                } else {
                    Literal::Number(text.clone())
                };
                self.advance();
                TableKey::Expression(Expression::Literal(LiteralExpression { value, position }))
            }
            _ => return Err(self.unexpected("a table key")),
        };

        self.expect(&TokenKind::Colon, "':'")?;
        let value = self.parse_expression()?;
        Ok(TableEntry { key, value })
    }

    fn parse_list(&mut self) -> Result<Expression, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume '['

        let elements = self.nested(|p| {
            let mut elements = Vec::new();
            while !p.check(&TokenKind::RightBracket) {
                elements.push(p.parse_expression()?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
            Ok(elements)
        })?;

        self.expect(&TokenKind::RightBracket, "']'")?;
        Ok(Expression::List(ListExpression { elements, position }))
    }

    /// Parses a name or parenthesized expression followed by any suffixes.
    pub(super) fn parse_reference(&mut self) -> Result<VariableReference, SyntaxError> {
        let base = if self.check(&TokenKind::LeftParen) {
            let position = self.current().position;
            self.advance();
            let expression = self.nested(|p| p.parse_expression())?;
            self.expect(&TokenKind::RightParen, "')'")?;
            VariableBase::Parenthesized(ParenthesizedExpression {
                expression: Box::new(expression),
                position,
            })
        } else {
            VariableBase::Name(self.expect_identifier()?)
        };

        let mut suffixes = Vec::new();
        loop {
            match &self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    suffixes.push(Suffix::Member(self.expect_identifier()?));
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.nested(|p| p.parse_expression())?;
                    self.expect(&TokenKind::RightBracket, "']'")?;
                    suffixes.push(Suffix::Index(index));
                }
                TokenKind::LeftParen => {
                    suffixes.push(Suffix::Call(self.parse_arguments()?));
                }
                TokenKind::Colon
                    if self.method_calls
                        && matches!(self.peek_kind(1), TokenKind::Identifier(_))
                        && matches!(self.peek_kind(2), TokenKind::LeftParen) =>
                {
                    self.advance();
                    let name = self.expect_identifier()?;
                    suffixes.push(Suffix::Method(name, self.parse_arguments()?));
                }
                _ => break,
            }
        }

        Ok(VariableReference { base, suffixes })
    }

    fn parse_arguments(&mut self) -> Result<Arguments, SyntaxError> {
        let position = self.current().position;
        self.expect(&TokenKind::LeftParen, "'('")?;
        let values = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.nested(|p| p.parse_expression_list())?
        };
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(Arguments { values, position })
    }

    /// Splits a chain ending in a call into the callee and the call itself.
    pub(super) fn split_call(
        mut reference: VariableReference,
    ) -> Result<CallExpression, VariableReference> {
        match reference.suffixes.pop() {
            Some(Suffix::Call(arguments)) => Ok(CallExpression {
                callee: reference,
                method: None,
                arguments,
            }),
            Some(Suffix::Method(name, arguments)) => Ok(CallExpression {
                callee: reference,
                method: Some(name),
                arguments,
            }),
            Some(other) => {
                reference.suffixes.push(other);
                Err(reference)
            }
            None => Err(reference),
        }
    }

    fn reference_expression(reference: VariableReference) -> Expression {
        match Self::split_call(reference) {
            Ok(call) => Expression::Call(call),
            Err(VariableReference {
                base: VariableBase::Parenthesized(inner),
                suffixes,
            }) if suffixes.is_empty() => Expression::Parenthesized(inner),
            Err(reference) => Expression::Variable(reference),
        }
    }
}
