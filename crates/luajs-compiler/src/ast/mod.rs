//! Abstract Syntax Tree (AST) definitions for LuaJS.
//!
//! The tree is built once by the parser and never mutated afterwards. Every
//! node records the [`Position`] of its first token so the translator can
//! keep the emitted Lua on the same lines as the source.

use crate::lexer::Position;

/// A complete LuaJS program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Statement>,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The name of the identifier
    pub name: String,
    /// Where the name token sits
    pub position: Position,
}

/// A LuaJS statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Block statement { ... }
    Block(BlockStatement),
    /// let a, b = x, y
    LocalDeclaration(LocalDeclaration),
    /// a.b, c = x, y
    GlobalAssignment(GlobalAssignment),
    /// v op= e
    CompoundAssignment(CompoundAssignment),
    /// A call used as a statement
    FunctionCall(CallExpression),
    /// ::name::
    LabelDeclaration(LabelStatement),
    /// goto name
    Goto(GotoStatement),
    /// Return statement
    Return(ReturnStatement),
    /// If statement
    If(IfStatement),
    /// While statement
    While(WhileStatement),
    /// Do-while statement
    DoWhile(DoWhileStatement),
    /// C-style for statement
    For(ForStatement),
    /// for (let k, v in e)
    ForIn(ForInStatement),
    /// for (let v, i of e)
    ForOf(ForOfStatement),
    /// Named function declaration
    FunctionDeclaration(FunctionDeclaration),
    /// Try/catch statement
    TryCatch(TryStatement),
    /// Throw statement
    Throw(ThrowStatement),
    /// v++
    Increment(UpdateStatement),
    /// v--
    Decrement(UpdateStatement),
    /// Break statement
    Break(Position),
    /// Continue statement
    Continue(Position),
    /// Empty statement (;)
    Empty(Position),
}

impl Statement {
    /// Where the statement's first token sits.
    pub fn position(&self) -> Position {
        match self {
            Statement::Block(s) => s.position,
            Statement::LocalDeclaration(s) => s.position,
            Statement::GlobalAssignment(s) => s.position,
            Statement::CompoundAssignment(s) => s.position,
            Statement::FunctionCall(s) => s.position(),
            Statement::LabelDeclaration(s) => s.position,
            Statement::Goto(s) => s.position,
            Statement::Return(s) => s.position,
            Statement::If(s) => s.position,
            Statement::While(s) => s.position,
            Statement::DoWhile(s) => s.position,
            Statement::For(s) => s.position,
            Statement::ForIn(s) => s.position,
            Statement::ForOf(s) => s.position,
            Statement::FunctionDeclaration(s) => s.position,
            Statement::TryCatch(s) => s.position,
            Statement::Throw(s) => s.position,
            Statement::Increment(s) | Statement::Decrement(s) => s.position(),
            Statement::Break(p) | Statement::Continue(p) | Statement::Empty(p) => *p,
        }
    }

    /// Returns true for a braced block.
    pub fn is_block(&self) -> bool {
        matches!(self, Statement::Block(_))
    }
}

/// A block statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The statements in the block
    pub body: Vec<Statement>,
    /// Position of the opening brace
    pub position: Position,
}

/// A local variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclaration {
    /// The declared names
    pub names: Vec<Identifier>,
    /// Initial values, empty when there is no initializer
    pub values: Vec<Expression>,
    /// Position of `let`
    pub position: Position,
}

/// A plain (multiple) assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalAssignment {
    /// Assignment targets
    pub targets: Vec<VariableReference>,
    /// Assigned values
    pub values: Vec<Expression>,
    /// Position of the first target
    pub position: Position,
}

/// An assignment with an operator, such as `x += 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundAssignment {
    /// The assigned variable
    pub target: VariableReference,
    /// The operator applied to the old value
    pub operator: BinaryOperator,
    /// Position of the operator token
    pub operator_position: Position,
    /// The right-hand side
    pub value: Expression,
    /// Position of the target
    pub position: Position,
}

/// A `::name::` label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStatement {
    /// The label name
    pub label: Identifier,
    /// Position of the opening `::`
    pub position: Position,
}

/// A `goto name` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct GotoStatement {
    /// The target label
    pub label: Identifier,
    /// Position of `goto`
    pub position: Position,
}

/// A return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Returned values, empty for a bare `return`
    pub values: Vec<Expression>,
    /// Position of `return`
    pub position: Position,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// The then branch
    pub consequent: Box<Statement>,
    /// The optional else branch
    pub alternate: Option<Box<Statement>>,
    /// Position of `if`
    pub position: Position,
}

/// A while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The condition
    pub test: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Position of `while`
    pub position: Position,
}

/// A do-while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    /// The loop body
    pub body: Box<Statement>,
    /// The condition checked after each iteration
    pub test: Expression,
    /// Position of `do`
    pub position: Position,
}

/// A C-style for statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// The initializer
    pub init: Option<Box<Statement>>,
    /// The condition
    pub test: Option<Expression>,
    /// The update statement
    pub update: Option<Box<Statement>>,
    /// The loop body
    pub body: Box<Statement>,
    /// Position of `for`
    pub position: Position,
}

/// A for-in statement over an iterator expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    /// Loop variables
    pub names: Vec<Identifier>,
    /// The iterator expression (e.g. `pairs(t)`)
    pub iterator: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Position of `for`
    pub position: Position,
}

/// A for-of statement over the array part of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    /// Variable receiving each element
    pub value: Identifier,
    /// Optional variable receiving each index
    pub index: Option<Identifier>,
    /// The iterated table
    pub iterable: Expression,
    /// The loop body
    pub body: Box<Statement>,
    /// Position of `for`
    pub position: Position,
}

/// A named function declaration such as `function a.b:c(x) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// Dotted name path, at least one element
    pub path: Vec<Identifier>,
    /// Method name after `:`
    pub method: Option<Identifier>,
    /// The parameters
    pub params: Vec<Identifier>,
    /// The function body
    pub body: BlockStatement,
    /// Position of `function`
    pub position: Position,
}

/// A try/catch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    /// The protected block
    pub block: BlockStatement,
    /// The catch parameter
    pub param: Option<Identifier>,
    /// The catch block
    pub handler: BlockStatement,
    /// Position of `try`
    pub position: Position,
}

/// A throw statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    /// The thrown value
    pub argument: Expression,
    /// Position of `throw`
    pub position: Position,
}

/// An increment or decrement statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// The updated variable
    pub target: VariableReference,
}

impl UpdateStatement {
    /// Where the target starts.
    pub fn position(&self) -> Position {
        self.target.position()
    }
}

/// A LuaJS expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// (e)
    Parenthesized(ParenthesizedExpression),
    /// Literal value
    Literal(LiteralExpression),
    /// function (x) { ... }
    Function(FunctionExpression),
    /// (x) => e
    Arrow(ArrowFunctionExpression),
    /// Name or member/index chain
    Variable(VariableReference),
    /// c ? a : b
    Conditional(ConditionalExpression),
    /// Function or method call
    Call(CallExpression),
    /// { key: value }
    Table(TableExpression),
    /// [a, b]
    List(ListExpression),
    /// Binary operation
    Binary(BinaryExpression),
    /// Unary operation
    Unary(UnaryExpression),
}

impl Expression {
    /// Where the expression's first token sits.
    pub fn position(&self) -> Position {
        match self {
            Expression::Parenthesized(e) => e.position,
            Expression::Literal(e) => e.position,
            Expression::Function(e) => e.position,
            Expression::Arrow(e) => e.position,
            Expression::Variable(e) => e.position(),
            Expression::Conditional(e) => e.test.position(),
            Expression::Call(e) => e.position(),
            Expression::Table(e) => e.position,
            Expression::List(e) => e.position,
            Expression::Binary(e) => e.left.position(),
            Expression::Unary(e) => e.position,
        }
    }

    /// Returns the source text of a number literal.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            Expression::Literal(LiteralExpression {
                value: Literal::Number(text),
                ..
            }) => Some(text),
            _ => None,
        }
    }

    /// Returns true for a string literal.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Expression::Literal(LiteralExpression {
                value: Literal::String(_),
                ..
            })
        )
    }

    /// Returns true for a `..` expression.
    pub fn is_concat(&self) -> bool {
        matches!(
            self,
            Expression::Binary(BinaryExpression {
                operator: BinaryOperator::Concat,
                ..
            })
        )
    }
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    /// The inner expression
    pub expression: Box<Expression>,
    /// Position of `(`
    pub position: Position,
}

/// A literal expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    /// The literal value
    pub value: Literal,
    /// Position of the literal token
    pub position: Position,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// String literal as written, quotes included
    String(String),
    /// Number literal as written
    Number(String),
    /// Boolean literal
    Boolean(bool),
    /// nil / null
    Nil,
}

/// An anonymous function literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    /// The parameters
    pub params: Vec<Identifier>,
    /// The function body
    pub body: BlockStatement,
    /// Position of `function`
    pub position: Position,
}

/// An arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpression {
    /// The parameters
    pub params: Vec<Identifier>,
    /// The body
    pub body: ArrowBody,
    /// Position of the first token
    pub position: Position,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Expression body, returned implicitly
    Expression(Box<Expression>),
    /// Block body
    Block(BlockStatement),
}

/// A variable reference: a base followed by a chain of suffixes.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableReference {
    /// The start of the chain
    pub base: VariableBase,
    /// Member, index and call suffixes, applied left to right
    pub suffixes: Vec<Suffix>,
}

impl VariableReference {
    /// Where the chain starts.
    pub fn position(&self) -> Position {
        match &self.base {
            VariableBase::Name(id) => id.position,
            VariableBase::Parenthesized(e) => e.position,
        }
    }

    /// Returns the name when the reference is a bare identifier.
    pub fn as_name(&self) -> Option<&str> {
        match &self.base {
            VariableBase::Name(id) if self.suffixes.is_empty() => Some(&id.name),
            _ => None,
        }
    }
}

/// The start of a variable chain.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableBase {
    /// A plain name
    Name(Identifier),
    /// A parenthesized expression, always followed by a suffix
    Parenthesized(ParenthesizedExpression),
}

/// One link of a variable chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Suffix {
    /// .name
    Member(Identifier),
    /// [e]
    Index(Expression),
    /// (args)
    Call(Arguments),
    /// :name(args)
    Method(Identifier, Arguments),
}

/// A parenthesized argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    /// The argument expressions
    pub values: Vec<Expression>,
    /// Position of `(`
    pub position: Position,
}

/// A call whose result is used, or a call statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// Everything before the final call
    pub callee: VariableReference,
    /// Method name for `a:m()` calls
    pub method: Option<Identifier>,
    /// The arguments
    pub arguments: Arguments,
}

impl CallExpression {
    /// Where the callee starts.
    pub fn position(&self) -> Position {
        self.callee.position()
    }
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    /// The condition
    pub test: Box<Expression>,
    /// Value when the condition holds
    pub consequent: Box<Expression>,
    /// Value otherwise
    pub alternate: Box<Expression>,
}

/// A table constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExpression {
    /// The entries
    pub entries: Vec<TableEntry>,
    /// Position of `{`
    pub position: Position,
}

/// A key/value entry of a table constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    /// The key
    pub key: TableKey,
    /// The value
    pub value: Expression,
}

/// Table entry key.
#[derive(Debug, Clone, PartialEq)]
pub enum TableKey {
    /// name: value
    Name(Identifier),
    /// [e]: value, "s": value or 1: value
    Expression(Expression),
}

/// A list constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ListExpression {
    /// The elements
    pub elements: Vec<Expression>,
    /// Position of `[`
    pub position: Position,
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand
    pub left: Box<Expression>,
    /// Right operand
    pub right: Box<Expression>,
    /// Position of the operator token
    pub operator_position: Position,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// **
    Power,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Modulo,
    /// +
    Add,
    /// -
    Subtract,
    /// ..
    Concat,
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// <=
    LessThanEqual,
    /// >=
    GreaterThanEqual,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// &&
    And,
    /// ||
    Or,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// &
    BitAnd,
    /// ^
    BitXor,
    /// |
    BitOr,
}

/// How a binary operator is written in Lua.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowering {
    /// `left op right`
    Infix(&'static str),
    /// `function(left, right)`
    Call(&'static str),
}

impl BinaryOperator {
    /// The Lua form of this operator.
    pub fn lowering(self) -> Lowering {
        match self {
            BinaryOperator::Power => Lowering::Infix("^"),
            BinaryOperator::Multiply => Lowering::Infix("*"),
            BinaryOperator::Divide => Lowering::Infix("/"),
            BinaryOperator::Modulo => Lowering::Infix("%"),
            BinaryOperator::Add => Lowering::Infix("+"),
            BinaryOperator::Subtract => Lowering::Infix("-"),
            BinaryOperator::Concat => Lowering::Infix(".."),
            BinaryOperator::LessThan => Lowering::Infix("<"),
            BinaryOperator::GreaterThan => Lowering::Infix(">"),
            BinaryOperator::LessThanEqual => Lowering::Infix("<="),
            BinaryOperator::GreaterThanEqual => Lowering::Infix(">="),
            BinaryOperator::Equal => Lowering::Infix("=="),
            BinaryOperator::NotEqual => Lowering::Infix("~="),
            BinaryOperator::And => Lowering::Infix("and"),
            BinaryOperator::Or => Lowering::Infix("or"),
            BinaryOperator::LeftShift => Lowering::Call("bit32.lshift"),
            BinaryOperator::RightShift => Lowering::Call("bit32.rshift"),
            BinaryOperator::BitAnd => Lowering::Call("bit32.band"),
            BinaryOperator::BitXor => Lowering::Call("bit32.bxor"),
            BinaryOperator::BitOr => Lowering::Call("bit32.bor"),
        }
    }
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Expression>,
    /// Position of the operator token
    pub position: Position,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// !
    Not,
    /// -
    Negate,
    /// ~
    BitNot,
    /// #
    Length,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(name: &str, line: u32) -> Identifier {
        Identifier {
            name: name.to_string(),
            position: Position::new(line, 0),
        }
    }

    #[test]
    fn test_bare_name_reference() {
        let reference = VariableReference {
            base: VariableBase::Name(name("i", 2)),
            suffixes: vec![],
        };
        assert_eq!(reference.as_name(), Some("i"));
        assert_eq!(reference.position(), Position::new(2, 0));

        let member = VariableReference {
            base: VariableBase::Name(name("t", 1)),
            suffixes: vec![Suffix::Member(name("i", 1))],
        };
        assert_eq!(member.as_name(), None);
    }

    #[test]
    fn test_binary_position_is_left_operand() {
        let expr = Expression::Binary(BinaryExpression {
            operator: BinaryOperator::Add,
            left: Box::new(Expression::Literal(LiteralExpression {
                value: Literal::Number("1".into()),
                position: Position::new(3, 4),
            })),
            right: Box::new(Expression::Literal(LiteralExpression {
                value: Literal::Number("2".into()),
                position: Position::new(4, 0),
            })),
            operator_position: Position::new(3, 6),
        });
        assert_eq!(expr.position(), Position::new(3, 4));
        assert!(!expr.is_concat());
    }

    #[test]
    fn test_lowering_table() {
        assert_eq!(BinaryOperator::Power.lowering(), Lowering::Infix("^"));
        assert_eq!(BinaryOperator::NotEqual.lowering(), Lowering::Infix("~="));
        assert_eq!(BinaryOperator::And.lowering(), Lowering::Infix("and"));
        assert_eq!(BinaryOperator::BitXor.lowering(), Lowering::Call("bit32.bxor"));
        assert_eq!(
            BinaryOperator::LeftShift.lowering(),
            Lowering::Call("bit32.lshift")
        );
    }

    #[test]
    fn test_literal_helpers() {
        let number = Expression::Literal(LiteralExpression {
            value: Literal::Number("0x10".into()),
            position: Position::default(),
        });
        let string = Expression::Literal(LiteralExpression {
            value: Literal::String("'s'".into()),
            position: Position::default(),
        });
        assert_eq!(number.as_number(), Some("0x10"));
        assert_eq!(string.as_number(), None);
        assert!(string.is_string());
        assert!(!number.is_string());
    }
}
