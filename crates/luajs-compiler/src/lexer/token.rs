//! Token definitions for the LuaJS lexer.

/// A span in the source code, representing a range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A line/column location in the source.
///
/// Lines start at 1, columns are character offsets starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number, 1-based
    pub line: u32,
    /// Character offset within the line, 0-based
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// Where the first character of the token sits
    pub position: Position,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }
}

/// The different kinds of tokens in LuaJS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, kept as written
    Number(String),
    /// String literal, kept as written including both quotes
    String(String),
    /// Boolean true
    True,
    /// Boolean false
    False,
    /// nil (also spelled null)
    Nil,

    /// Identifier
    Identifier(String),

    // Keywords
    Break,
    Catch,
    Continue,
    Do,
    Else,
    For,
    Function,
    Goto,
    If,
    In,
    Let,
    Return,
    Throw,
    Try,
    While,

    // Punctuation
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// .
    Dot,
    /// ..
    DotDot,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// :
    Colon,
    /// ::
    ColonColon,
    /// ?
    Question,
    /// =>
    Arrow,

    // Operators
    /// <
    LessThan,
    /// >
    GreaterThan,
    /// <=
    LessThanEqual,
    /// >=
    GreaterThanEqual,
    /// ==
    EqualEqual,
    /// !=
    NotEqual,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// **
    StarStar,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// &
    Ampersand,
    /// |
    Pipe,
    /// ^
    Caret,
    /// !
    Bang,
    /// ~
    Tilde,
    /// #
    Hash,
    /// &&
    AmpersandAmpersand,
    /// ||
    PipePipe,

    // Assignment
    /// =
    Equal,
    /// +=
    PlusEqual,
    /// -=
    MinusEqual,
    /// *=
    StarEqual,
    /// /=
    SlashEqual,
    /// %=
    PercentEqual,
    /// **=
    StarStarEqual,
    /// ..=
    DotDotEqual,
    /// <<=
    LeftShiftEqual,
    /// >>=
    RightShiftEqual,
    /// &=
    AmpersandEqual,
    /// |=
    PipeEqual,
    /// ^=
    CaretEqual,

    /// End of file
    Eof,
}

impl TokenKind {
    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Catch
                | TokenKind::Continue
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::Goto
                | TokenKind::If
                | TokenKind::In
                | TokenKind::Let
                | TokenKind::Return
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::While
        )
    }

    /// Returns true if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// Returns true if an expression may begin with this token.
    pub fn starts_expression(&self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Identifier(_)
                    | TokenKind::Function
                    | TokenKind::LeftParen
                    | TokenKind::LeftBrace
                    | TokenKind::LeftBracket
                    | TokenKind::Bang
                    | TokenKind::Minus
                    | TokenKind::Tilde
                    | TokenKind::Hash
            )
    }

    /// Returns the binary operator that a compound assignment token applies.
    pub fn compound_operator(&self) -> Option<crate::ast::BinaryOperator> {
        use crate::ast::BinaryOperator;

        Some(match self {
            TokenKind::PlusEqual => BinaryOperator::Add,
            TokenKind::MinusEqual => BinaryOperator::Subtract,
            TokenKind::StarEqual => BinaryOperator::Multiply,
            TokenKind::SlashEqual => BinaryOperator::Divide,
            TokenKind::PercentEqual => BinaryOperator::Modulo,
            TokenKind::StarStarEqual => BinaryOperator::Power,
            TokenKind::DotDotEqual => BinaryOperator::Concat,
            TokenKind::LeftShiftEqual => BinaryOperator::LeftShift,
            TokenKind::RightShiftEqual => BinaryOperator::RightShift,
            TokenKind::AmpersandEqual => BinaryOperator::BitAnd,
            TokenKind::PipeEqual => BinaryOperator::BitOr,
            TokenKind::CaretEqual => BinaryOperator::BitXor,
            _ => return None,
        })
    }

    /// A short human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(text) | TokenKind::String(text) => format!("'{}'", text),
            TokenKind::Identifier(name) => format!("'{}'", name),
            TokenKind::Eof => "<EOF>".to_string(),
            other => format!("{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 15);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn test_position_default_is_first_line() {
        assert_eq!(Position::default(), Position::new(1, 0));
    }

    #[test]
    fn test_position_ordering_follows_lines_first() {
        assert!(Position::new(1, 40) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::Goto.is_keyword());
        assert!(TokenKind::Let.is_keyword());
        assert!(TokenKind::Try.is_keyword());
        assert!(!TokenKind::Identifier("of".to_string()).is_keyword());
        assert!(!TokenKind::Nil.is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
    }

    #[test]
    fn test_is_literal() {
        assert!(TokenKind::Number("42".to_string()).is_literal());
        assert!(TokenKind::String("'x'".to_string()).is_literal());
        assert!(TokenKind::Nil.is_literal());
        assert!(!TokenKind::Plus.is_literal());
        assert!(!TokenKind::Identifier("x".to_string()).is_literal());
    }

    #[test]
    fn test_starts_expression() {
        assert!(TokenKind::Minus.starts_expression());
        assert!(TokenKind::LeftBrace.starts_expression());
        assert!(TokenKind::Function.starts_expression());
        assert!(!TokenKind::Semicolon.starts_expression());
        assert!(!TokenKind::RightBrace.starts_expression());
        assert!(!TokenKind::Else.starts_expression());
    }

    #[test]
    fn test_compound_operator_mapping() {
        use crate::ast::BinaryOperator;

        assert_eq!(
            TokenKind::PlusEqual.compound_operator(),
            Some(BinaryOperator::Add)
        );
        assert_eq!(
            TokenKind::DotDotEqual.compound_operator(),
            Some(BinaryOperator::Concat)
        );
        assert_eq!(
            TokenKind::CaretEqual.compound_operator(),
            Some(BinaryOperator::BitXor)
        );
        assert_eq!(TokenKind::Equal.compound_operator(), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Identifier("foo".into()).describe(), "'foo'");
        assert_eq!(TokenKind::Eof.describe(), "<EOF>");
        assert_eq!(TokenKind::Semicolon.describe(), "Semicolon");
    }
}
