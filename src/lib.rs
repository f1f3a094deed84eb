//! exprtools: parse, rewrite and serialize typed lambda expression trees.
//!
//! Text such as `(a, b) => Math.Pow(a, b)` is parsed into a syntax tree,
//! built into a typed [`LambdaExpr`] against a host type system, and can then
//! be inlined into other lambdas, have its known member reads folded into
//! constants, be rendered back to canonical text, or be evaluated.
//!
//! # Crates
//!
//! - `exprtools-core`: the typed tree, values, errors and the host capability
//! - `exprtools-parser`: lexer and arena-allocated syntax tree
//! - `exprtools-compiler`: the semantic builder and its resolvers
//! - `exprtools-registry` / `exprtools-modules`: the host type registry and
//!   the standard `System` types
//! - `exprtools-transform`: inlining, folding, serialization, property paths
//!
//! # Example
//!
//! ```
//! use exprtools::{Context, ParameterResolver, Value};
//!
//! let ctx = Context::with_default_modules().unwrap();
//! let sum = ctx.parse("(int x, int y) => x + y + 1").unwrap();
//! let triple = ctx.parse("(int a) => a * 3").unwrap();
//! let quintuple = ctx.parse("(int a) => a * 5").unwrap();
//!
//! let resolver = ParameterResolver::new()
//!     .register("x", triple)
//!     .register("y", quintuple);
//! let inlined = ctx.inline(&resolver, &sum);
//!
//! let result = ctx.evaluate(&inlined, &[Value::Int32(3), Value::Int32(2)]).unwrap();
//! assert_eq!(result, Value::Int32(20));
//! ```
//!
//! The free functions below run against a lazily built default context with
//! the standard modules.

mod context;
pub mod eval;

use std::sync::LazyLock;

use thiserror::Error;

pub use context::{Context, ContextConfig, ContextError, ParseOptions};
pub use eval::Evaluator;

pub use exprtools_compiler::{
    DictionaryParameterTypeResolver, LambdaShape, MethodResolver, NamespaceTypeNameResolver,
    ParameterTypeResolver, SingleParameterTypeResolver, StaticMethodResolver,
    TypeNameMapResolver, TypeNameResolver,
};
pub use exprtools_core::{
    BinaryOp, CallContext, ConstructorInfo, DataType, EvalError, Expr, ExprError, HostObject,
    HostTypeSystem, LambdaExpr, MemberInfo, MethodSignature, NamespaceConfig, NativeFn,
    ParameterExpr, PathError, Span, UnaryOp, Value,
};
pub use exprtools_registry::{Module, TypeBuilder, TypeRegistry};
pub use exprtools_transform::{InlineResolver, ParameterResolver, SingleResolver, inline_single};

/// Errors from the free functions, which may also fail to build the default
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl Error {
    /// The expression error, if this is one.
    pub fn as_expr(&self) -> Option<&ExprError> {
        match self {
            Error::Expr(err) => Some(err),
            Error::Context(_) => None,
        }
    }
}

static DEFAULT_CONTEXT: LazyLock<Result<Context, ContextError>> =
    LazyLock::new(Context::with_default_modules);

/// The shared context behind the free functions.
pub fn default_context() -> Result<&'static Context, ContextError> {
    DEFAULT_CONTEXT.as_ref().map_err(Clone::clone)
}

/// Parse and build `text` against the default context.
pub fn parse(text: &str) -> Result<LambdaExpr, Error> {
    Ok(default_context()?.parse(text)?)
}

/// Parse and build `text` against the default context and an expected shape.
pub fn parse_typed(text: &str, shape: &LambdaShape) -> Result<LambdaExpr, Error> {
    Ok(default_context()?.parse_typed(text, shape)?)
}

/// Inline parameters of `lambda` as chosen by `resolver`.
pub fn inline(resolver: &dyn InlineResolver, lambda: &LambdaExpr) -> LambdaExpr {
    exprtools_transform::inline(resolver, lambda)
}

/// Fold known member reads of `lambda` using the default context's types.
pub fn fold_constants(lambda: &LambdaExpr) -> Result<LambdaExpr, Error> {
    Ok(default_context()?.fold_constants(lambda))
}

/// Render `lambda` with the default context's namespaces left unqualified.
pub fn serialize(lambda: &LambdaExpr) -> Result<String, Error> {
    Ok(default_context()?.serialize(lambda))
}

pub use eval::evaluate;
pub use exprtools_transform::property_path;
