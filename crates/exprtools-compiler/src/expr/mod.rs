//! Semantic builder: parsed lambda syntax to a typed expression tree.
//!
//! The [`ExprBuilder`] walks the syntax tree once, top-down. Each syntax
//! node resolves to a [`Resolved`]: a typed value, a bare type, a method
//! waiting for its invocation, or a dotted name that has not resolved yet and
//! is completed by an enclosing member access. The per-traversal
//! [`BuildContext`] carries the visible lambda parameters and, while the
//! callee of an invocation is visited, the argument types of that call.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use exprtools_compiler::ExprBuilder;
//! use exprtools_compiler::resolver::SingleParameterTypeResolver;
//! use exprtools_core::{DataType, NamespaceConfig};
//! use exprtools_parser::Parser;
//! use exprtools_registry::TypeRegistry;
//!
//! let registry = TypeRegistry::with_modules(exprtools_modules::standard()).unwrap();
//! let namespaces = NamespaceConfig::system();
//! let doubles = SingleParameterTypeResolver::new(DataType::double());
//! let builder = ExprBuilder::new(&registry, &namespaces).with_parameter_types(&doubles);
//!
//! let arena = Bump::new();
//! let syntax = Parser::parse_lambda("(a, b) => Math.Pow(a, b)", &arena).unwrap();
//! let lambda = builder.build(syntax).unwrap();
//! assert_eq!(lambda.return_type(), Some(&DataType::double()));
//! ```

mod binary;
mod calls;
mod cast;
mod identifiers;
mod lambda;
mod literals;
mod member;
mod new;
mod ternary;
mod types;
mod unary;

use exprtools_core::{
    DataType, Expr, ExprError, HostTypeSystem, LambdaExpr, MethodSignature, NamespaceConfig,
    ParameterExpr, Span,
};
use exprtools_parser::ast;
use tracing::{debug, trace};

use crate::resolver::{
    MethodResolver, NamespaceTypeNameResolver, ParameterTypeResolver, TypeNameResolver,
};

type Result<T> = std::result::Result<T, ExprError>;

// ============================================================================
// Context
// ============================================================================

/// Parameter types and return type a caller expects of a lambda.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LambdaShape {
    pub params: Vec<DataType>,
    pub return_type: Option<DataType>,
}

impl LambdaShape {
    pub fn new(params: Vec<DataType>) -> Self {
        Self {
            params,
            return_type: None,
        }
    }

    pub fn returning(mut self, ty: DataType) -> Self {
        self.return_type = Some(ty);
        self
    }
}

/// The invocation whose callee is being visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    pub arg_types: Vec<DataType>,
    /// Explicit generic arguments written on the callee, `Max<int>(...)`.
    pub type_args: Vec<DataType>,
}

/// Per-traversal scope passed down the recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildContext<'c> {
    params: &'c [ParameterExpr],
    call: Option<&'c CallSite>,
}

impl<'c> BuildContext<'c> {
    pub fn new(params: &'c [ParameterExpr]) -> Self {
        Self { params, call: None }
    }

    /// Parameters visible here, outermost lambda first.
    pub fn params(&self) -> &'c [ParameterExpr] {
        self.params
    }

    pub fn parameter(&self, name: &str) -> Option<&'c ParameterExpr> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Pending argument types, set only in call-callee position.
    pub fn call(&self) -> Option<&'c CallSite> {
        self.call
    }

    /// The same scope, in callee position of `site`.
    pub fn callee<'s>(self, site: &'s CallSite) -> BuildContext<'s>
    where
        'c: 's,
    {
        BuildContext {
            params: self.params,
            call: Some(site),
        }
    }

    /// The same scope, outside any callee position.
    pub fn value(self) -> Self {
        Self { call: None, ..self }
    }
}

// ============================================================================
// Resolution results
// ============================================================================

/// A method picked for an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callee {
    /// Instance receiver, `None` for static and free methods.
    pub target: Option<Expr>,
    pub method: MethodSignature,
    /// Receiver passed as the first argument of a sequence operation.
    pub receiver_arg: Option<Expr>,
}

impl Callee {
    pub fn new(target: Option<Expr>, method: MethodSignature) -> Self {
        Self {
            target,
            method,
            receiver_arg: None,
        }
    }

    pub fn sequence_op(receiver: Expr, method: MethodSignature) -> Self {
        Self {
            target: None,
            method,
            receiver_arg: Some(receiver),
        }
    }
}

/// What a syntax node resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Value(Expr),
    Type(DataType),
    Method(Callee),
    /// A dotted name that is neither a parameter, method nor type yet.
    Unresolved { name: String, span: Span },
}

impl Resolved {
    /// The value, or the error for a node used where a value is required.
    pub fn into_value(self, span: Span) -> Result<Expr> {
        match self {
            Resolved::Value(expr) => Ok(expr),
            Resolved::Unresolved { name, span } => {
                Err(ExprError::UnresolvedIdentifier { name, span })
            }
            Resolved::Type(ty) => Err(ExprError::argument_shape(
                format!("type '{ty}' cannot be used as a value"),
                span,
            )),
            Resolved::Method(callee) => Err(ExprError::argument_shape(
                format!("method '{}' must be invoked", callee.method.name),
                span,
            )),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds typed lambdas against a host type system and a resolver chain.
///
/// Type names go to the caller's [`TypeNameResolver`] first and then to the
/// [`NamespaceTypeNameResolver`] over the given [`NamespaceConfig`].
pub struct ExprBuilder<'a> {
    host: &'a dyn HostTypeSystem,
    namespaces: NamespaceTypeNameResolver<'a>,
    parameter_types: Option<&'a dyn ParameterTypeResolver>,
    methods: Option<&'a dyn MethodResolver>,
    type_names: Option<&'a dyn TypeNameResolver>,
}

impl<'a> ExprBuilder<'a> {
    pub fn new(host: &'a dyn HostTypeSystem, namespaces: &'a NamespaceConfig) -> Self {
        Self {
            host,
            namespaces: NamespaceTypeNameResolver::new(host, namespaces),
            parameter_types: None,
            methods: None,
            type_names: None,
        }
    }

    pub fn with_parameter_types(mut self, resolver: &'a dyn ParameterTypeResolver) -> Self {
        self.parameter_types = Some(resolver);
        self
    }

    pub fn with_methods(mut self, resolver: &'a dyn MethodResolver) -> Self {
        self.methods = Some(resolver);
        self
    }

    pub fn with_type_names(mut self, resolver: &'a dyn TypeNameResolver) -> Self {
        self.type_names = Some(resolver);
        self
    }

    pub fn host(&self) -> &'a dyn HostTypeSystem {
        self.host
    }

    /// Build a lambda whose parameter types come from annotations or the
    /// parameter type resolver.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&self, syntax: &ast::LambdaExpr<'_>) -> Result<LambdaExpr> {
        self.build_shaped(syntax, None)
    }

    /// Build a lambda that must match `shape`.
    ///
    /// Unannotated parameters take the shape's types by position. A body
    /// that can be implicitly converted to the expected return type is.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build_with_shape(
        &self,
        syntax: &ast::LambdaExpr<'_>,
        shape: &LambdaShape,
    ) -> Result<LambdaExpr> {
        self.build_shaped(syntax, Some(shape))
    }

    fn build_shaped(
        &self,
        syntax: &ast::LambdaExpr<'_>,
        shape: Option<&LambdaShape>,
    ) -> Result<LambdaExpr> {
        debug!(params = syntax.params.len(), "building lambda");
        let lambda = lambda::compile_lambda(self, syntax, BuildContext::default(), shape)?;
        debug!(
            return_type = ?lambda.return_type().map(ToString::to_string),
            "built lambda"
        );
        Ok(lambda)
    }

    /// Resolve one syntax node.
    pub fn resolve(&self, expr: &ast::Expr<'_>, ctx: BuildContext<'_>) -> Result<Resolved> {
        match expr {
            ast::Expr::Literal(lit) => literals::compile_literal(lit).map(Resolved::Value),
            ast::Expr::Ident(ident) => identifiers::compile_ident(self, ident, ctx),
            ast::Expr::PredefinedType(keyword) => types::resolve_keyword(keyword).map(Resolved::Type),
            ast::Expr::Binary(bin) => binary::compile_binary(self, bin, ctx).map(Resolved::Value),
            ast::Expr::Unary(un) => unary::compile_unary(self, un, ctx).map(Resolved::Value),
            ast::Expr::Conditional(cond) => {
                ternary::compile_conditional(self, cond, ctx).map(Resolved::Value)
            }
            ast::Expr::Call(call) => calls::compile_call(self, call, ctx).map(Resolved::Value),
            ast::Expr::Index(index) => member::compile_index(self, index, ctx).map(Resolved::Value),
            ast::Expr::Member(access) => member::compile_member(self, access, ctx),
            ast::Expr::Cast(cast) => cast::compile_cast(self, cast, ctx).map(Resolved::Value),
            ast::Expr::New(new) => new::compile_new(self, new, ctx).map(Resolved::Value),
            ast::Expr::NewArray(array) => {
                new::compile_new_array(self, array, ctx).map(Resolved::Value)
            }
            ast::Expr::Lambda(nested) => lambda::compile_lambda(self, nested, ctx.value(), None)
                .map(|l| Resolved::Value(Expr::Lambda(l))),
            ast::Expr::Paren(paren) => self.resolve(paren.expr, ctx),
        }
    }

    /// Build a node that must produce a value.
    pub fn build_value(&self, expr: &ast::Expr<'_>, ctx: BuildContext<'_>) -> Result<Expr> {
        self.resolve(expr, ctx.value())?.into_value(expr.span())
    }

    /// Build a node that must produce a typed value, which rules out lambdas.
    pub(crate) fn build_operand(
        &self,
        expr: &ast::Expr<'_>,
        ctx: BuildContext<'_>,
    ) -> Result<(Expr, DataType)> {
        let value = self.build_value(expr, ctx)?;
        match value.data_type().cloned() {
            Some(ty) => Ok((value, ty)),
            None => Err(ExprError::argument_shape(
                "a lambda cannot be used as an operand",
                expr.span(),
            )),
        }
    }

    pub(crate) fn resolve_type_expr(&self, ty: &ast::TypeExpr<'_>) -> Result<DataType> {
        types::resolve_type_expr(self, ty)
    }

    pub(crate) fn resolve_type_name(&self, name: &str) -> Option<DataType> {
        if let Some(ty) = self.type_names.and_then(|r| r.resolve_type_name(name)) {
            trace!(name, resolved = %ty, "type name from caller resolver");
            return Some(ty);
        }
        self.namespaces.resolve_type_name(name)
    }

    pub(crate) fn resolve_method(
        &self,
        name: &str,
        arg_types: &[DataType],
    ) -> Option<MethodSignature> {
        let method = self.methods?.resolve_method(name, arg_types)?;
        trace!(name, "method from method resolver");
        Some(method)
    }

    pub(crate) fn resolve_parameter_type(&self, name: &str) -> Option<DataType> {
        let ty = self.parameter_types?.resolve_parameter_type(name)?;
        trace!(name, resolved = %ty, "parameter type from resolver");
        Some(ty)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bumpalo::Bump;
    use exprtools_parser::Parser;
    use exprtools_registry::TypeRegistry;

    pub fn registry() -> TypeRegistry {
        TypeRegistry::with_modules(exprtools_modules::standard()).unwrap()
    }

    /// Build `source` with every unannotated parameter typed `param`.
    pub fn build(source: &str, param: DataType) -> Result<LambdaExpr> {
        let registry = registry();
        let namespaces = NamespaceConfig::system();
        let params = crate::resolver::SingleParameterTypeResolver::new(param);
        let builder = ExprBuilder::new(&registry, &namespaces).with_parameter_types(&params);
        let arena = Bump::new();
        let syntax = Parser::parse_lambda(source, &arena)?;
        builder.build(syntax)
    }
}
