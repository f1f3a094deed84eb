//! Expression syntax nodes.
//!
//! Provides nodes for every construct of the expression language:
//! - Literals (numbers, strings, chars, booleans, `null`)
//! - Identifiers, optionally with generic arguments (`Max<int>`)
//! - Binary and prefix unary operations
//! - Member access, invocation and element access
//! - Conditionals, casts, object and array creation
//! - Lambdas
//!
//! # Expression Precedence
//!
//! The parser uses Pratt parsing with the following precedence levels:
//! 1. Conditional (?:) - right associative
//! 2. Logical OR (||)
//! 3. Logical AND (&&)
//! 4. Exclusive or / power (^)
//! 5. Equality (==, !=)
//! 6. Relational (<, <=, >, >=)
//! 7. Additive (+, -)
//! 8. Multiplicative (*, /, %)
//! 9. Prefix unary (-, +, !) and casts
//! 10. Postfix (member, call, index)

use crate::ast::types::TypeExpr;
use crate::ast::{BinaryOp, Ident, UnaryOp};
use exprtools_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Simple or generic name
    Ident(IdentExpr<'ast>),
    /// Predefined type keyword used as a receiver, `int.MaxValue`
    PredefinedType(Ident<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
    Unary(&'ast UnaryExpr<'ast>),
    Conditional(&'ast ConditionalExpr<'ast>),
    Call(&'ast CallExpr<'ast>),
    /// Element access `a[i]`
    Index(&'ast IndexExpr<'ast>),
    Member(&'ast MemberExpr<'ast>),
    Cast(&'ast CastExpr<'ast>),
    /// Object creation `new T(args)`
    New(&'ast NewExpr<'ast>),
    /// Array creation `new T[] { ... }` or `new[] { ... }`
    NewArray(&'ast NewArrayExpr<'ast>),
    Lambda(&'ast LambdaExpr<'ast>),
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::PredefinedType(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Conditional(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::Member(e) => e.span,
            Self::Cast(e) => e.span,
            Self::New(e) => e.span,
            Self::NewArray(e) => e.span,
            Self::Lambda(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Node kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Ident(_) => "identifier",
            Self::PredefinedType(_) => "predefined type",
            Self::Binary(_) => "binary expression",
            Self::Unary(_) => "unary expression",
            Self::Conditional(_) => "conditional expression",
            Self::Call(_) => "invocation",
            Self::Index(_) => "element access",
            Self::Member(_) => "member access",
            Self::Cast(_) => "cast",
            Self::New(_) => "object creation",
            Self::NewArray(_) => "array creation",
            Self::Lambda(_) => "lambda",
            Self::Paren(_) => "parenthesized expression",
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = paren.expr;
        }
        expr
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Integer literal; the magnitude is kept unsigned until typed.
    Int { value: u64, suffix: IntSuffix },
    Real { value: f64, suffix: RealSuffix },
    /// String literal with escapes already processed.
    String(&'ast str),
    Char(char),
    Bool(bool),
    Null,
}

/// Integer literal suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntSuffix {
    None,
    /// `L`
    Long,
    /// `U`
    Unsigned,
    /// `UL` or `LU`
    UnsignedLong,
}

/// Real literal suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealSuffix {
    None,
    /// `F`
    Float,
    /// `D`
    Double,
    /// `M`
    Decimal,
}

/// An identifier expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub ident: Ident<'ast>,
    /// Generic arguments, `Max<int>`
    pub type_args: &'ast [TypeExpr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

/// `condition ? then_expr : else_expr`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalExpr<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_expr: &'ast Expr<'ast>,
    pub else_expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// An invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// An identifier (free method) or member access (static or instance method).
    pub callee: &'ast Expr<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

/// A call or element access argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'ast> {
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub object: &'ast Expr<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

/// `object.member` or `object.member<T>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    pub object: &'ast Expr<'ast>,
    pub member: Ident<'ast>,
    pub type_args: &'ast [TypeExpr<'ast>],
    pub span: Span,
}

/// `(Type)operand`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpr<'ast> {
    pub target_type: TypeExpr<'ast>,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    pub ty: TypeExpr<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewArrayExpr<'ast> {
    /// Declared element type; `None` for `new[] { ... }`.
    pub element_type: Option<TypeExpr<'ast>>,
    pub items: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

/// A lambda with an expression body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    pub params: &'ast [LambdaParam<'ast>],
    pub body: &'ast Expr<'ast>,
    /// Whether the parameter list was written in parentheses.
    pub parenthesized: bool,
    pub span: Span,
}

/// A lambda parameter with an optional type annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaParam<'ast> {
    pub ty: Option<TypeExpr<'ast>>,
    pub name: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_span() {
        let span = Span::new(1, 1, 0, 4);
        let expr = Expr::Literal(LiteralExpr {
            kind: LiteralKind::Null,
            span,
        });
        assert_eq!(expr.span(), span);
        assert_eq!(expr.kind_name(), "literal");
    }

    #[test]
    fn unparenthesized_strips_nesting() {
        let inner = Expr::Literal(LiteralExpr {
            kind: LiteralKind::Bool(true),
            span: Span::new(1, 3, 2, 4),
        });
        let once = ParenExpr {
            expr: &inner,
            span: Span::new(1, 2, 1, 6),
        };
        let once_expr = Expr::Paren(&once);
        let twice = ParenExpr {
            expr: &once_expr,
            span: Span::new(1, 1, 0, 8),
        };
        assert_eq!(Expr::Paren(&twice).unparenthesized(), &inner);
    }
}
