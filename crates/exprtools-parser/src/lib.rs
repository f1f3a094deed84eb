//! exprtools parser crate.
//!
//! This crate provides the lexer and parser for the lambda expression
//! language. It includes:
//! - Lexical analysis (tokenization)
//! - Syntax tree definitions, allocated in a `bumpalo` arena
//! - A Pratt parser turning tokens into the syntax tree
//! - Error types that convert into [`exprtools_core::ExprError`]
//!
//! # Example
//!
//! ```
//! use exprtools_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! match Parser::parse_lambda("(a, b) => Math.Pow(a, b)", &arena) {
//!     Ok(lambda) => println!("parsed lambda with {} parameters", lambda.params.len()),
//!     Err(error) => eprintln!("parse error: {}", error),
//! }
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{ParseError, ParseErrorKind, Parser};
pub use lexer::{Lexer, Token, TokenKind};
