//! Syntax tree for the expression language.
//!
//! This module provides:
//! - Node definitions for expressions and type expressions
//! - The Pratt [`Parser`] producing them
//! - Error types and reporting
//!
//! # Example
//!
//! ```
//! use exprtools_parser::ast::{Expr, Parser};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let lambda = Parser::parse_lambda("d => d.MyInt % 2 == 0", &arena).unwrap();
//! assert_eq!(lambda.params[0].name.name, "d");
//! assert!(matches!(lambda.body, Expr::Binary(_)));
//! ```

mod error;
pub mod node;
pub mod ops;

mod parser;
mod type_parser;
pub mod types;

pub mod expr;
mod expr_parser;

pub use error::{ParseError, ParseErrorKind};
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use parser::Parser;
pub use types::*;
