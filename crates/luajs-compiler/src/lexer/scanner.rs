//! The scanner that produces tokens from source text.

use super::{Position, Span, Token, TokenKind};
use crate::error::{LexError, SyntaxError};

/// A scanner that tokenizes LuaJS source code.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 0,
        }
    }

    /// Scans the whole source, returning every token followed by `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace_and_comments()?;

        let start = self.current_pos;
        let position = self.position();

        let Some((_pos, ch)) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start), position));
        };

        let kind = match ch {
            // Single-character tokens
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,
            '#' => TokenKind::Hash,

            // Multi-character tokens
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start, ch, position)?
            }
            '.' => self.scan_dot(),
            ':' => self.scan_colon(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' => self.scan_single_or_assign(TokenKind::Slash, TokenKind::SlashEqual),
            '%' => self.scan_single_or_assign(TokenKind::Percent, TokenKind::PercentEqual),
            '^' => self.scan_single_or_assign(TokenKind::Caret, TokenKind::CaretEqual),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),

            // String literals
            '"' | '\'' => self.scan_string(start, ch, position)?,

            // Numbers
            '0'..='9' => self.scan_number(start, ch, position)?,

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(ch),

            _ => {
                return Err(SyntaxError::lexical(
                    position,
                    LexError::UnexpectedCharacter(ch),
                ));
            }
        };

        Ok(Token::new(kind, Span::new(start, self.current_pos), position))
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r') => {
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        self.advance();
                        self.advance();
                        while let Some(ch) = self.peek() {
                            if ch == '\n' || ch == '\r' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        let position = self.position();
                        self.advance();
                        self.advance();
                        let mut prev = ' ';
                        loop {
                            let Some((_, ch)) = self.advance() else {
                                return Err(SyntaxError::lexical(
                                    position,
                                    LexError::UnterminatedComment,
                                ));
                            };
                            if prev == '*' && ch == '/' {
                                break;
                            }
                            prev = ch;
                        }
                    }
                    // Not a comment, it's a division operator
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn scan_single_or_assign(&mut self, single: TokenKind, assign: TokenKind) -> TokenKind {
        if self.eat('=') { assign } else { single }
    }

    fn scan_dot(&mut self) -> TokenKind {
        if self.eat('.') {
            if self.eat('=') {
                TokenKind::DotDotEqual
            } else {
                TokenKind::DotDot
            }
        } else {
            TokenKind::Dot
        }
    }

    fn scan_colon(&mut self) -> TokenKind {
        if self.eat(':') {
            TokenKind::ColonColon
        } else {
            TokenKind::Colon
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        match self.peek() {
            Some('+') => {
                self.advance();
                TokenKind::PlusPlus
            }
            Some('=') => {
                self.advance();
                TokenKind::PlusEqual
            }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        match self.peek() {
            Some('-') => {
                self.advance();
                TokenKind::MinusMinus
            }
            Some('=') => {
                self.advance();
                TokenKind::MinusEqual
            }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        match self.peek() {
            Some('*') => {
                self.advance();
                self.scan_single_or_assign(TokenKind::StarStar, TokenKind::StarStarEqual)
            }
            Some('=') => {
                self.advance();
                TokenKind::StarEqual
            }
            _ => TokenKind::Star,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('<') => {
                self.advance();
                self.scan_single_or_assign(TokenKind::LeftShift, TokenKind::LeftShiftEqual)
            }
            Some('=') => {
                self.advance();
                TokenKind::LessThanEqual
            }
            _ => TokenKind::LessThan,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        match self.peek() {
            Some('>') => {
                self.advance();
                self.scan_single_or_assign(TokenKind::RightShift, TokenKind::RightShiftEqual)
            }
            Some('=') => {
                self.advance();
                TokenKind::GreaterThanEqual
            }
            _ => TokenKind::GreaterThan,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                TokenKind::EqualEqual
            }
            Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Equal,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.eat('=') {
            TokenKind::NotEqual
        } else {
            TokenKind::Bang
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        match self.peek() {
            Some('&') => {
                self.advance();
                TokenKind::AmpersandAmpersand
            }
            Some('=') => {
                self.advance();
                TokenKind::AmpersandEqual
            }
            _ => TokenKind::Ampersand,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        match self.peek() {
            Some('|') => {
                self.advance();
                TokenKind::PipePipe
            }
            Some('=') => {
                self.advance();
                TokenKind::PipeEqual
            }
            _ => TokenKind::Pipe,
        }
    }

    /// Scans a quoted string. Escapes are validated but left untouched.
    fn scan_string(
        &mut self,
        start: usize,
        quote: char,
        position: Position,
    ) -> Result<TokenKind, SyntaxError> {
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    return Err(SyntaxError::lexical(position, LexError::UnterminatedString));
                }
                Some('\\') => {
                    let escape = self.position();
                    self.advance();
                    match self.advance() {
                        None => {
                            return Err(SyntaxError::lexical(
                                position,
                                LexError::UnterminatedString,
                            ));
                        }
                        Some((_, 'u')) => self.check_unicode_escape(escape)?,
                        Some(_) => {}
                    }
                }
                Some(ch) => {
                    self.advance();
                    if ch == quote {
                        break;
                    }
                }
            }
        }

        Ok(TokenKind::String(self.source[start..self.current_pos].to_string()))
    }

    fn check_unicode_escape(&mut self, escape: Position) -> Result<(), SyntaxError> {
        for _ in 0..4 {
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                return Err(SyntaxError::lexical(escape, LexError::InvalidUnicodeEscape));
            }
            self.advance();
        }
        Ok(())
    }

    fn scan_number(
        &mut self,
        start: usize,
        first: char,
        position: Position,
    ) -> Result<TokenKind, SyntaxError> {
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            if !self.eat_digits(|c| c.is_ascii_hexdigit()) {
                return Err(self.malformed_number(start, position));
            }
            return Ok(TokenKind::Number(self.source[start..self.current_pos].to_string()));
        }

        if first != '.' {
            self.eat_digits(|c| c.is_ascii_digit());
            // `1..x` is a concatenation, not a fraction
            if self.peek() == Some('.') && self.peek_next() != Some('.') {
                self.advance();
                self.eat_digits(|c| c.is_ascii_digit());
            }
        } else {
            self.eat_digits(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.eat_digits(|c| c.is_ascii_digit()) {
                return Err(self.malformed_number(start, position));
            }
        }

        Ok(TokenKind::Number(self.source[start..self.current_pos].to_string()))
    }

    /// Consumes a run of digits, returning whether at least one was found.
    fn eat_digits(&mut self, accept: impl Fn(char) -> bool) -> bool {
        let mut found = false;
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            self.advance();
            found = true;
        }
        found
    }

    fn malformed_number(&self, start: usize, position: Position) -> SyntaxError {
        SyntaxError::lexical(
            position,
            LexError::MalformedNumber(self.source[start..self.current_pos].to_string()),
        )
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);

        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match name.as_str() {
            "break" => TokenKind::Break,
            "catch" => TokenKind::Catch,
            "continue" => TokenKind::Continue,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            "let" => TokenKind::Let,
            "nil" | "null" => TokenKind::Nil,
            "return" => TokenKind::Return,
            "throw" => TokenKind::Throw,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "while" => TokenKind::While,
            _ => TokenKind::Identifier(name),
        }
    }
}

/// Checks if a character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Checks if a character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}
