//! Lexical analysis for expression text.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{TYPE_KEYWORDS, Token, TokenKind, lookup_keyword};
