//! The main parser implementation.

use crate::ast::*;
use crate::error::SyntaxError;
use crate::lexer::{Position, Scanner, Span, Token, TokenKind};

/// Deepest nesting of statements and operands accepted before giving up.
const MAX_DEPTH: usize = 100;

/// A recursive descent parser for LuaJS.
///
/// The whole source is tokenized up front so arrow functions can be
/// recognised by looking ahead to the matching `=>`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Cleared at the top level of a ternary's middle operand, where
    /// `a:m()` would swallow the `:` of the ternary.
    pub(super) method_calls: bool,
    depth: usize,
}

impl Parser {
    /// Creates a parser over scanned tokens.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            let position = tokens.last().map(|t| t.position).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end), position));
        }
        Self {
            tokens,
            pos: 0,
            method_calls: true,
            depth: 0,
        }
    }

    /// Tokenizes and parses a complete program.
    pub fn parse(source: &str) -> Result<Program, SyntaxError> {
        let tokens = Scanner::new(source).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    /// Parses the tokens into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let body = self.parse_statement_list()?;
        if !self.is_at_end() {
            return Err(self.unexpected("a statement"));
        }
        Ok(Program { body })
    }

    /// Parses statements until `}` or end of input.
    fn parse_statement_list(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut body = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let statement = self.parse_statement()?;
            // One `;` after a statement terminates it, the rest are empty statements
            if !matches!(statement, Statement::Block(_) | Statement::Empty(_)) {
                self.eat(&TokenKind::Semicolon);
            }
            body.push(statement);
        }

        Ok(body)
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        self.descend(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;

        match &self.current().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty(position))
            }
            TokenKind::Break => {
                self.advance();
                Ok(Statement::Break(position))
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Statement::Continue(position))
            }
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::Let => self.parse_local_declaration(),
            TokenKind::ColonColon => self.parse_label(),
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_identifier()?;
                Ok(Statement::Goto(GotoStatement { label, position }))
            }
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Throw => {
                self.advance();
                let argument = self.parse_expression()?;
                Ok(Statement::Throw(ThrowStatement { argument, position }))
            }
            TokenKind::Identifier(_) | TokenKind::LeftParen => self.parse_reference_statement(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// Parses a loop or branch body: a statement with an optional `;`.
    fn parse_body(&mut self) -> Result<Box<Statement>, SyntaxError> {
        let statement = self.parse_statement()?;
        if !matches!(statement, Statement::Empty(_)) {
            self.eat(&TokenKind::Semicolon);
        }
        Ok(Box::new(statement))
    }

    pub(super) fn parse_block(&mut self) -> Result<BlockStatement, SyntaxError> {
        let position = self.current().position;
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let body = self.parse_statement_list()?;
        self.expect(&TokenKind::RightBrace, "'}'")?;
        Ok(BlockStatement { body, position })
    }

    fn parse_local_declaration(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'let'
        let names = self.parse_names()?;
        let values = self.parse_initializer()?;
        Ok(Statement::LocalDeclaration(LocalDeclaration {
            names,
            values,
            position,
        }))
    }

    fn parse_initializer(&mut self) -> Result<Vec<Expression>, SyntaxError> {
        if self.eat(&TokenKind::Equal) {
            self.parse_expression_list()
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_label(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume '::'
        let label = self.expect_identifier()?;
        self.expect(&TokenKind::ColonColon, "'::'")?;
        Ok(Statement::LabelDeclaration(LabelStatement { label, position }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'return'
        let values = if self.current().kind.starts_expression() {
            self.parse_expression_list()?
        } else {
            Vec::new()
        };
        Ok(Statement::Return(ReturnStatement { values, position }))
    }

    fn parse_if_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'if'
        let test = self.parse_condition()?;
        let consequent = self.parse_body()?;
        let alternate = if self.eat(&TokenKind::Else) {
            Some(self.parse_body()?)
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
            position,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'while'
        let test = self.parse_condition()?;
        let body = self.parse_body()?;
        Ok(Statement::While(WhileStatement {
            test,
            body,
            position,
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'do'
        let body = self.parse_body()?;
        self.expect(&TokenKind::While, "'while'")?;
        let test = self.parse_condition()?;
        Ok(Statement::DoWhile(DoWhileStatement {
            body,
            test,
            position,
        }))
    }

    /// Parses `( exp )`.
    fn parse_condition(&mut self) -> Result<Expression, SyntaxError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let test = self.nested(|p| p.parse_expression())?;
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(test)
    }

    fn parse_for_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'for'
        self.expect(&TokenKind::LeftParen, "'('")?;

        // Check for for-in/for-of with variable declaration
        let init = if self.check(&TokenKind::Let) {
            let let_position = self.current().position;
            self.advance();
            let names = self.parse_names()?;

            if self.eat(&TokenKind::In) {
                let iterator = self.parse_expression()?;
                self.expect(&TokenKind::RightParen, "')'")?;
                let body = self.parse_body()?;
                return Ok(Statement::ForIn(ForInStatement {
                    names,
                    iterator,
                    body,
                    position,
                }));
            } else if self.check_identifier("of") {
                return self.parse_for_of_rest(names, position);
            }

            let values = self.parse_initializer()?;
            Some(Box::new(Statement::LocalDeclaration(LocalDeclaration {
                names,
                values,
                position: let_position,
            })))
        } else if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_statement()?))
        };
        self.expect(&TokenKind::Semicolon, "';'")?;

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "';'")?;

        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_statement()?))
        };
        self.expect(&TokenKind::RightParen, "')'")?;

        let body = self.parse_body()?;

        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
            position,
        }))
    }

    fn parse_for_of_rest(
        &mut self,
        names: Vec<Identifier>,
        position: Position,
    ) -> Result<Statement, SyntaxError> {
        if names.len() > 2 {
            return Err(SyntaxError::new(
                names[2].position,
                "for-of takes a value and an optional index",
            ));
        }
        self.advance(); // consume 'of'

        let mut names = names.into_iter();
        let Some(value) = names.next() else {
            return Err(self.unexpected("an identifier"));
        };
        let index = names.next();

        let iterable = self.parse_expression()?;
        self.expect(&TokenKind::RightParen, "')'")?;
        let body = self.parse_body()?;

        Ok(Statement::ForOf(ForOfStatement {
            value,
            index,
            iterable,
            body,
            position,
        }))
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'function'

        let mut path = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::Dot) {
            path.push(self.expect_identifier()?);
        }
        let method = if self.eat(&TokenKind::Colon) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let params = self.parse_parameters()?;
        let body = self.nested(|p| p.parse_block())?;

        Ok(Statement::FunctionDeclaration(FunctionDeclaration {
            path,
            method,
            params,
            body,
            position,
        }))
    }

    /// Parses `( names? )`.
    pub(super) fn parse_parameters(&mut self) -> Result<Vec<Identifier>, SyntaxError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let params = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_names()?
        };
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(params)
    }

    fn parse_try_statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.current().position;
        self.advance(); // consume 'try'
        let block = self.parse_block()?;

        self.expect(&TokenKind::Catch, "'catch'")?;
        let param = if self.eat(&TokenKind::LeftParen) {
            let id = self.expect_identifier()?;
            self.expect(&TokenKind::RightParen, "')'")?;
            Some(id)
        } else {
            None
        };
        let handler = self.parse_block()?;

        Ok(Statement::TryCatch(TryStatement {
            block,
            param,
            handler,
            position,
        }))
    }

    /// Parses assignments, updates and calls, which all start with a reference.
    fn parse_reference_statement(&mut self) -> Result<Statement, SyntaxError> {
        let target = self.parse_reference()?;

        match &self.current().kind {
            TokenKind::Equal | TokenKind::Comma => {
                let position = target.position();
                let mut targets = vec![self.assignable(target)?];
                while self.eat(&TokenKind::Comma) {
                    let next = self.parse_reference()?;
                    targets.push(self.assignable(next)?);
                }
                self.expect(&TokenKind::Equal, "'='")?;
                let values = self.parse_expression_list()?;
                Ok(Statement::GlobalAssignment(GlobalAssignment {
                    targets,
                    values,
                    position,
                }))
            }
            TokenKind::PlusPlus => {
                self.advance();
                Ok(Statement::Increment(UpdateStatement {
                    target: self.assignable(target)?,
                }))
            }
            TokenKind::MinusMinus => {
                self.advance();
                Ok(Statement::Decrement(UpdateStatement {
                    target: self.assignable(target)?,
                }))
            }
            kind => {
                if let Some(operator) = kind.compound_operator() {
                    let operator_position = self.current().position;
                    self.advance();
                    let target = self.assignable(target)?;
                    let position = target.position();
                    let value = self.parse_expression()?;
                    return Ok(Statement::CompoundAssignment(CompoundAssignment {
                        target,
                        operator,
                        operator_position,
                        value,
                        position,
                    }));
                }

                match Self::split_call(target) {
                    Ok(call) => Ok(Statement::FunctionCall(call)),
                    Err(_) => Err(self.unexpected("'=' or a call")),
                }
            }
        }
    }

    fn assignable(&self, target: VariableReference) -> Result<VariableReference, SyntaxError> {
        let valid = match target.suffixes.last() {
            None => matches!(target.base, VariableBase::Name(_)),
            Some(suffix) => matches!(suffix, Suffix::Member(_) | Suffix::Index(_)),
        };
        if valid {
            Ok(target)
        } else {
            Err(SyntaxError::new(
                target.position(),
                "invalid assignment target",
            ))
        }
    }

    /// Parses `NAME (, NAME)*`.
    pub(super) fn parse_names(&mut self) -> Result<Vec<Identifier>, SyntaxError> {
        let mut names = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        Ok(names)
    }

    // Helper methods

    pub(super) fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(super) fn peek_kind(&self, offset: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)].kind
    }

    pub(super) fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    pub(super) fn expect_identifier(&mut self) -> Result<Identifier, SyntaxError> {
        let token = self.current();
        if let TokenKind::Identifier(name) = &token.kind {
            let id = Identifier {
                name: name.clone(),
                position: token.position,
            };
            self.advance();
            Ok(id)
        } else {
            Err(self.unexpected("an identifier"))
        }
    }

    fn check_identifier(&self, name: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Identifier(s) if s == name)
    }

    pub(super) fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::new(
            token.position,
            format!(
                "mismatched input {} expecting {}",
                token.kind.describe(),
                expected
            ),
        )
    }

    /// Runs `f` with method-call sugar enabled, as inside any brackets.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        let saved = std::mem::replace(&mut self.method_calls, true);
        let result = f(self);
        self.method_calls = saved;
        result
    }

    /// Runs `f` one nesting level deeper, failing past [`MAX_DEPTH`].
    pub(super) fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new(
                self.current().position,
                "too deeply nested",
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to parse and get first statement
    fn parse_stmt(src: &str) -> Statement {
        let program = Parser::parse(src).unwrap();
        program.body.into_iter().next().unwrap()
    }

    // Helper to parse and check it succeeds
    fn parse_ok(src: &str) -> Program {
        Parser::parse(src).unwrap()
    }

    // Helper to parse and check it fails
    fn parse_err(src: &str) -> SyntaxError {
        Parser::parse(src).unwrap_err()
    }

    #[test]
    fn test_parse_local_declaration() {
        match parse_stmt("let a, b = 1, 2;") {
            Statement::LocalDeclaration(decl) => {
                assert_eq!(decl.names.len(), 2);
                assert_eq!(decl.values.len(), 2);
                assert_eq!(decl.names[1].name, "b");
            }
            other => panic!("expected local declaration, got {:?}", other),
        }
        match parse_stmt("let x") {
            Statement::LocalDeclaration(decl) => assert!(decl.values.is_empty()),
            other => panic!("expected local declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_terminating_semicolons_are_consumed() {
        let program = parse_ok("let x = 1; let y = 2;");
        assert_eq!(program.body.len(), 2);

        let program = parse_ok("let x = 1;; {} ;");
        assert!(matches!(program.body[0], Statement::LocalDeclaration(_)));
        assert!(matches!(program.body[1], Statement::Empty(_)));
        assert!(matches!(program.body[2], Statement::Block(_)));
        assert!(matches!(program.body[3], Statement::Empty(_)));
    }

    #[test]
    fn test_parse_assignments() {
        match parse_stmt("a.b, c[1] = x, y") {
            Statement::GlobalAssignment(assign) => {
                assert_eq!(assign.targets.len(), 2);
                assert_eq!(assign.values.len(), 2);
            }
            other => panic!("expected assignment, got {:?}", other),
        }
        match parse_stmt("x **= 2") {
            Statement::CompoundAssignment(assign) => {
                assert_eq!(assign.operator, BinaryOperator::Power);
                assert_eq!(assign.operator_position, Position::new(1, 2));
            }
            other => panic!("expected compound assignment, got {:?}", other),
        }
        assert!(matches!(parse_stmt("t.n++"), Statement::Increment(_)));
        assert!(matches!(parse_stmt("n--"), Statement::Decrement(_)));
    }

    #[test]
    fn test_invalid_assignment_targets() {
        assert_eq!(parse_err("f() = 1").message, "invalid assignment target");
        assert_eq!(parse_err("(a) = 1").message, "invalid assignment target");
        assert!(parse_err("a.b").message.contains("expecting '=' or a call"));
    }

    #[test]
    fn test_parse_call_statements() {
        match parse_stmt("obj.method(1, 2)") {
            Statement::FunctionCall(call) => {
                assert!(call.method.is_none());
                assert_eq!(call.callee.suffixes.len(), 1);
                assert_eq!(call.arguments.values.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
        match parse_stmt("obj:method()") {
            Statement::FunctionCall(call) => {
                assert_eq!(call.method.map(|m| m.name), Some("method".to_string()));
                assert!(call.callee.suffixes.is_empty());
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_labels_and_goto() {
        let program = parse_ok("::top:: goto top");
        assert!(matches!(&program.body[0], Statement::LabelDeclaration(l) if l.label.name == "top"));
        assert!(matches!(&program.body[1], Statement::Goto(g) if g.label.name == "top"));
    }

    #[test]
    fn test_parse_return_statement() {
        let program = parse_ok("function f() { return } function g() { return 1, 2; }");
        let Statement::FunctionDeclaration(f) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(matches!(&f.body.body[0], Statement::Return(r) if r.values.is_empty()));
        let Statement::FunctionDeclaration(g) = &program.body[1] else {
            panic!("expected function");
        };
        assert!(matches!(&g.body.body[0], Statement::Return(r) if r.values.len() == 2));
    }

    #[test]
    fn test_parse_if_statement() {
        match parse_stmt("if (x) a = 1; else { b = 2; }") {
            Statement::If(stmt) => {
                assert!(matches!(*stmt.consequent, Statement::GlobalAssignment(_)));
                assert!(matches!(stmt.alternate.as_deref(), Some(Statement::Block(_))));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_loops() {
        assert!(matches!(parse_stmt("while (true) {}"), Statement::While(_)));
        assert!(matches!(parse_stmt("do x++; while (x < 3)"), Statement::DoWhile(_)));

        match parse_stmt("for (let i = 0; i <= 10; i++) {}") {
            Statement::For(stmt) => {
                assert!(matches!(stmt.init.as_deref(), Some(Statement::LocalDeclaration(_))));
                assert!(stmt.test.is_some());
                assert!(matches!(stmt.update.as_deref(), Some(Statement::Increment(_))));
            }
            other => panic!("expected for, got {:?}", other),
        }

        match parse_stmt("for (;;) break") {
            Statement::For(stmt) => {
                assert!(stmt.init.is_none());
                assert!(stmt.test.is_none());
                assert!(stmt.update.is_none());
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_for_in_and_of() {
        match parse_stmt("for (let k, v in pairs(t)) {}") {
            Statement::ForIn(stmt) => assert_eq!(stmt.names.len(), 2),
            other => panic!("expected for-in, got {:?}", other),
        }
        match parse_stmt("for (let v, i of list) {}") {
            Statement::ForOf(stmt) => {
                assert_eq!(stmt.value.name, "v");
                assert_eq!(stmt.index.map(|i| i.name), Some("i".to_string()));
            }
            other => panic!("expected for-of, got {:?}", other),
        }
        assert!(parse_err("for (let a, b, c of list) {}")
            .message
            .contains("for-of"));
    }

    #[test]
    fn test_parse_function_declaration() {
        match parse_stmt("function a.b:c(x, y) { return x; }") {
            Statement::FunctionDeclaration(decl) => {
                assert_eq!(decl.path.len(), 2);
                assert_eq!(decl.method.map(|m| m.name), Some("c".to_string()));
                assert_eq!(decl.params.len(), 2);
                assert_eq!(decl.body.body.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_try_catch() {
        match parse_stmt("try { f(); } catch (e) { g(e); }") {
            Statement::TryCatch(stmt) => {
                assert_eq!(stmt.param.map(|p| p.name), Some("e".to_string()));
                assert_eq!(stmt.handler.body.len(), 1);
            }
            other => panic!("expected try, got {:?}", other),
        }
        match parse_stmt("try {} catch {}") {
            Statement::TryCatch(stmt) => assert!(stmt.param.is_none()),
            other => panic!("expected try, got {:?}", other),
        }
        assert!(parse_err("try {}").message.contains("'catch'"));
    }

    #[test]
    fn test_statement_positions() {
        let program = parse_ok("let x = 1\n\n  f(x)\nthrow 'e'");
        assert_eq!(program.body[0].position(), Position::new(1, 0));
        assert_eq!(program.body[1].position(), Position::new(3, 2));
        assert_eq!(program.body[2].position(), Position::new(4, 0));
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_err("let x = 1 # 2");
        assert_eq!(err.position(), Position::new(1, 10));
        assert!(parse_err("let = 1").message.contains("identifier"));
        assert!(parse_err("if x {}").message.contains("'('"));
        assert!(parse_err("{ let x = 1").message.contains("'}'"));
        assert!(parse_err("}").message.contains("a statement"));
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let parens = format!("x = {}1{};", "(".repeat(20000), ")".repeat(20000));
        let err = parse_err(&parens);
        assert_eq!(err.message, "too deeply nested");
        assert_eq!(err.line, 1);

        let blocks = format!("{}{}", "{".repeat(5000), "}".repeat(5000));
        assert_eq!(parse_err(&blocks).message, "too deeply nested");

        let branches = format!("{}f();", "if (a) ".repeat(5000));
        assert_eq!(parse_err(&branches).message, "too deeply nested");

        let prefixes = format!("x = {}a;", "-!".repeat(5000));
        assert_eq!(parse_err(&prefixes).message, "too deeply nested");

        let concat = format!("x = a{};", " .. a".repeat(5000));
        assert_eq!(parse_err(&concat).message, "too deeply nested");

        let ternary = format!("x = {}b;", "a ? b : ".repeat(5000));
        assert_eq!(parse_err(&ternary).message, "too deeply nested");
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        parse_ok(&format!("x = {}1{};", "(".repeat(40), ")".repeat(40)));
        parse_ok(&format!("{}{}", "{".repeat(40), "}".repeat(40)));
        parse_ok(&format!("x = a{};", " .. a".repeat(40)));
        parse_ok(&format!("x = {{a: {}1{}}};", "{a: ".repeat(30), "}".repeat(30)));
    }

    #[test]
    fn test_depth_resets_between_statements() {
        let statement = format!("x = {}1{};\n", "(".repeat(40), ")".repeat(40));
        parse_ok(&statement.repeat(10));
    }
}
