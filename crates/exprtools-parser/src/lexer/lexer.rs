//! Lexer for expression text.
//!
//! The [`Lexer`] converts source text into [`Token`]s, dispatching on the
//! first character of each token. Lexemes are copied into the arena so the
//! source can be dropped once tokenizing finishes.

use bumpalo::Bump;
use exprtools_core::Span;

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};
use crate::ast::{ParseError, ParseErrorKind};

/// Lexer for expression text.
///
/// The `'src` lifetime is the text being lexed, `'ast` the arena holding
/// the lexemes.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
        }
    }

    /// Lex the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token<'ast>>, ParseError> {
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

    /// Scan the next token.
    pub fn next_token(&mut self) -> Result<Token<'ast>, ParseError> {
        self.skip_trivia()?;

        let start = Start {
            line: self.cursor.line(),
            col: self.cursor.column(),
            offset: self.cursor.offset(),
        };

        let Some(c) = self.cursor.peek() else {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::point(start.line, start.col, start.offset),
            ));
        };

        match c {
            '"' => self.scan_string(start),
            '@' if self.cursor.peek_nth(1) == Some('"') => self.scan_verbatim_string(start),
            '\'' => self.scan_char(start),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            c if is_ident_start(c) => Ok(self.scan_identifier(start)),
            _ => self.scan_operator(start),
        }
    }

    // =========================================
    // Internal: helpers
    // =========================================

    fn span_from(&self, start: Start) -> Span {
        Span::new(
            start.line,
            start.col,
            start.offset,
            self.cursor.offset() - start.offset,
        )
    }

    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'ast> {
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start.offset));
        Token::new(kind, lexeme, self.span_from(start))
    }

    fn error(&self, kind: ParseErrorKind, start: Start, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, self.span_from(start), message)
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            self.cursor.eat_while(char::is_whitespace);
            if self.cursor.check_str("//") {
                self.cursor.eat_while(|c| c != '\n');
            } else if self.cursor.check_str("/*") {
                let start = Start {
                    line: self.cursor.line(),
                    col: self.cursor.column(),
                    offset: self.cursor.offset(),
                };
                self.cursor.advance();
                self.cursor.advance();
                loop {
                    if self.cursor.is_eof() {
                        return Err(self.error(
                            ParseErrorKind::UnterminatedComment,
                            start,
                            "missing '*/'",
                        ));
                    }
                    if self.cursor.check_str("*/") {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
            } else {
                return Ok(());
            }
        }
    }

    // =========================================
    // Scanning: literals
    // =========================================

    /// `"..."` with backslash escapes; must close on the same line.
    fn scan_string(&mut self, start: Start) -> Result<Token<'ast>, ParseError> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedString,
                        start,
                        "missing closing '\"'",
                    ));
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    return Ok(self.make_token(TokenKind::StringLiteral, start));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// `@"..."` where `""` stands for a quote; may span lines.
    fn scan_verbatim_string(&mut self, start: Start) -> Result<Token<'ast>, ParseError> {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedString,
                        start,
                        "missing closing '\"'",
                    ));
                }
                Some('"') if self.cursor.peek_nth(1) == Some('"') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    return Ok(self.make_token(TokenKind::StringLiteral, start));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn scan_char(&mut self, start: Start) -> Result<Token<'ast>, ParseError> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedString,
                        start,
                        "missing closing '\\''",
                    ));
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Ok(self.make_token(TokenKind::CharLiteral, start));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Decimal or hex number with an optional suffix. Suffix letters are
    /// consumed here and validated by the parser.
    fn scan_number(&mut self, start: Start) -> Result<Token<'ast>, ParseError> {
        if self.cursor.check_str("0x") || self.cursor.check_str("0X") {
            self.cursor.advance();
            self.cursor.advance();
            let digits = self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            if digits.is_empty() {
                return Err(self.error(
                    ParseErrorKind::InvalidNumber,
                    start,
                    "expected hex digits after '0x'",
                ));
            }
            self.cursor.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            return Ok(self.make_token(TokenKind::IntLiteral, start));
        }

        let mut is_real = false;
        self.consume_digits();

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.consume_digits();
            is_real = true;
        }

        if let Some('e' | 'E') = self.cursor.peek() {
            let signed = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self
                .cursor
                .peek_nth(digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.consume_digits();
                is_real = true;
            }
        }

        let suffix = self.cursor.eat_while(|c| c.is_ascii_alphabetic());
        if suffix
            .chars()
            .any(|c| matches!(c, 'f' | 'F' | 'd' | 'D' | 'm' | 'M'))
        {
            is_real = true;
        }

        let kind = if is_real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntLiteral
        };
        Ok(self.make_token(kind, start))
    }

    fn consume_digits(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    // =========================================
    // Scanning: identifiers and operators
    // =========================================

    fn scan_identifier(&mut self, start: Start) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    fn scan_operator(&mut self, start: Start) -> Result<Token<'ast>, ParseError> {
        let Some(c) = self.cursor.advance() else {
            return Err(self.error(ParseErrorKind::UnexpectedChar, start, "end of input"));
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            (',', _) => TokenKind::Comma,
            (';', _) => TokenKind::Semicolon,
            (':', _) => TokenKind::Colon,
            ('.', _) => TokenKind::Dot,
            ('~', _) => TokenKind::Tilde,

            ('?', Some('?')) => self.take(TokenKind::QuestionQuestion),
            ('?', _) => TokenKind::Question,

            ('+', Some('+')) => self.take(TokenKind::PlusPlus),
            ('+', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('+', _) => TokenKind::Plus,

            ('-', Some('-')) => self.take(TokenKind::MinusMinus),
            ('-', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('-', _) => TokenKind::Minus,

            ('*', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('*', _) => TokenKind::Star,
            ('/', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('/', _) => TokenKind::Slash,
            ('%', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('%', _) => TokenKind::Percent,
            ('^', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('^', _) => TokenKind::Caret,

            ('=', Some('=')) => self.take(TokenKind::EqualEqual),
            ('=', Some('>')) => self.take(TokenKind::Arrow),
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => self.take(TokenKind::BangEqual),
            ('!', _) => TokenKind::Bang,

            ('<', Some('=')) => self.take(TokenKind::LessEqual),
            ('<', Some('<')) => self.take(TokenKind::LessLess),
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => self.take(TokenKind::GreaterEqual),
            ('>', Some('>')) => self.take(TokenKind::GreaterGreater),
            ('>', _) => TokenKind::Greater,

            ('&', Some('&')) => self.take(TokenKind::AmpAmp),
            ('&', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('&', _) => TokenKind::Amp,

            ('|', Some('|')) => self.take(TokenKind::PipePipe),
            ('|', Some('=')) => self.take(TokenKind::CompoundAssign),
            ('|', _) => TokenKind::Pipe,

            _ => {
                return Err(self.error(
                    ParseErrorKind::UnexpectedChar,
                    start,
                    format!("unexpected character '{}'", c),
                ));
            }
        };

        Ok(self.make_token(kind, start))
    }

    /// Consume the second character of a two-character operator.
    fn take(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }
}

#[derive(Clone, Copy)]
struct Start {
    line: u32,
    col: u32,
    offset: u32,
}
