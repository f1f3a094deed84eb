//! Type expressions.
//!
//! Types appear in lambda parameter annotations, casts, object creation,
//! array creation and generic argument lists:
//! - Predefined keywords: `int`, `string`, `decimal`
//! - Dotted names with optional generic arguments: `System.Guid`, `List<int>`
//! - Array suffixes: `int[]`
//! - Nullable suffixes: `Guid?`

use crate::ast::Ident;
use exprtools_core::Span;
use std::fmt;

/// A type expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// A predefined type keyword.
    Predefined(Ident<'ast>),
    /// A dotted name, each segment with its own generic arguments.
    Named(NamedType<'ast>),
    /// `T[]`
    Array(&'ast ArrayType<'ast>),
    /// `T?`
    Nullable(&'ast NullableType<'ast>),
}

impl<'ast> TypeExpr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Predefined(ident) => ident.span,
            TypeExpr::Named(named) => named.span,
            TypeExpr::Array(array) => array.span,
            TypeExpr::Nullable(nullable) => nullable.span,
        }
    }
}

impl fmt::Display for TypeExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Predefined(ident) => write!(f, "{}", ident.name),
            TypeExpr::Named(named) => write!(f, "{}", named),
            TypeExpr::Array(array) => write!(f, "{}[]", array.element),
            TypeExpr::Nullable(nullable) => write!(f, "{}?", nullable.inner),
        }
    }
}

/// A dotted type name such as `System.Collections.Generic.List<int>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedType<'ast> {
    pub segments: &'ast [NameSegment<'ast>],
    pub span: Span,
}

impl<'ast> NamedType<'ast> {
    /// The name without generic arguments, `System.Guid`.
    pub fn dotted_name(&self) -> String {
        let mut name = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            name.push_str(segment.ident.name);
        }
        name
    }

    /// Generic arguments of the last segment.
    pub fn type_args(&self) -> &'ast [TypeExpr<'ast>] {
        self.segments.last().map(|s| s.type_args).unwrap_or(&[])
    }
}

impl fmt::Display for NamedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment.ident.name)?;
            if !segment.type_args.is_empty() {
                write!(f, "<")?;
                for (j, arg) in segment.type_args.iter().enumerate() {
                    if j > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")?;
            }
        }
        Ok(())
    }
}

/// One segment of a [`NamedType`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameSegment<'ast> {
    pub ident: Ident<'ast>,
    pub type_args: &'ast [TypeExpr<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayType<'ast> {
    pub element: TypeExpr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullableType<'ast> {
    pub inner: TypeExpr<'ast>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident<'_> {
        Ident::new(name, Span::default())
    }

    #[test]
    fn named_type_display_and_dotted_name() {
        let int_arg = [TypeExpr::Predefined(ident("int"))];
        let segments = [
            NameSegment {
                ident: ident("Generic"),
                type_args: &[],
            },
            NameSegment {
                ident: ident("List"),
                type_args: &int_arg,
            },
        ];
        let named = NamedType {
            segments: &segments,
            span: Span::default(),
        };
        assert_eq!(named.dotted_name(), "Generic.List");
        assert_eq!(named.to_string(), "Generic.List<int>");
        assert_eq!(named.type_args().len(), 1);
    }

    #[test]
    fn suffix_display() {
        let array = ArrayType {
            element: TypeExpr::Predefined(ident("double")),
            span: Span::default(),
        };
        let nullable = NullableType {
            inner: TypeExpr::Array(&array),
            span: Span::default(),
        };
        assert_eq!(TypeExpr::Nullable(&nullable).to_string(), "double[]?");
    }
}
