//! Token types for the expression lexer.

use exprtools_core::Span;
use std::fmt;

/// A token from the expression text.
///
/// The lexeme is copied into the parse arena, so tokens outlive the source
/// string borrowed by the lexer.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token kinds of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal, possibly hex and suffixed: `42`, `0xFF`, `10L`
    IntLiteral,
    /// Real literal, possibly suffixed: `3.14`, `1e10`, `2.5f`
    RealLiteral,
    /// String literal: `"hello"`, `@"C:\path"`
    StringLiteral,
    /// Char literal: `'a'`
    CharLiteral,

    Identifier,

    // =========================================
    // Keywords
    // =========================================
    True,
    False,
    Null,
    New,
    /// A predefined type keyword (`int`, `string`, ...); see the lexeme.
    TypeKeyword,

    // =========================================
    // Operators
    // =========================================
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    Tilde,
    Amp,
    Pipe,
    AmpAmp,
    PipePipe,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LessLess,
    GreaterGreater,
    PlusPlus,
    MinusMinus,
    Equal,
    /// Any compound assignment (`+=`, `-=`, ...).
    CompoundAssign,
    /// `=>`
    Arrow,
    Question,
    QuestionQuestion,
    Colon,
    Dot,

    // =========================================
    // Delimiters
    // =========================================
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,

    Eof,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral | RealLiteral | StringLiteral | CharLiteral | True | False | Null
        )
    }

    /// Operators the lexer recognises but the language does not support.
    pub fn is_unsupported_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Tilde
                | Amp
                | Pipe
                | LessLess
                | GreaterGreater
                | PlusPlus
                | MinusMinus
                | Equal
                | CompoundAssign
                | QuestionQuestion
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            RealLiteral => "real literal",
            StringLiteral => "string literal",
            CharLiteral => "char literal",
            Identifier => "identifier",
            True => "'true'",
            False => "'false'",
            Null => "'null'",
            New => "'new'",
            TypeKeyword => "type keyword",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Caret => "'^'",
            Bang => "'!'",
            Tilde => "'~'",
            Amp => "'&'",
            Pipe => "'|'",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            LessLess => "'<<'",
            GreaterGreater => "'>>'",
            PlusPlus => "'++'",
            MinusMinus => "'--'",
            Equal => "'='",
            CompoundAssign => "compound assignment",
            Arrow => "'=>'",
            Question => "'?'",
            QuestionQuestion => "'??'",
            Colon => "':'",
            Dot => "'.'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Comma => "','",
            Semicolon => "';'",
            Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Predefined type keywords usable in annotations, casts and `new`.
pub const TYPE_KEYWORDS: [&str; 15] = [
    "bool", "byte", "sbyte", "char", "short", "ushort", "int", "uint", "long", "ulong", "float",
    "double", "decimal", "string", "object",
];

/// Map a keyword string to its [`TokenKind`], or `None` if not a keyword.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "true" => True,
        "false" => False,
        "null" => Null,
        "new" => New,
        _ if TYPE_KEYWORDS.contains(&ident) => TypeKeyword,
        _ => return None,
    })
}
